use crate::error::{Error, Result};
use std::env;
use std::net::SocketAddr;

/// Listen address variable.
pub const ADDR_ENV: &str = "TIMETABLE_HTTP_ADDR";
/// Log filter variable, read by `env_logger`.
pub const LOG_ENV: &str = "TIMETABLE_LOG";

pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Settings for the HTTP binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_addr(env::var(ADDR_ENV).ok().as_deref())
    }

    /// Builds the config from an optional address string, using
    /// [`DEFAULT_ADDR`] when none is given.
    pub fn from_addr(addr: Option<&str>) -> Result<Self> {
        let addr = addr.unwrap_or(DEFAULT_ADDR);
        let addr = addr.parse().map_err(|source| Error::InvalidAddress {
            addr: addr.to_string(),
            source,
        })?;
        Ok(Self { addr })
    }
}
