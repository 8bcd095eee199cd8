use thiserror::Error;

/// Errors raised at the edges of the engine. Scheduling itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid date '{date}', expected YYYY-MM-DD: {source}")]
    InvalidDate {
        date: String,
        source: chrono::ParseError,
    },

    #[error("invalid listen address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
