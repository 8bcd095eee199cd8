use timetable_engine::config::{self, ServerConfig};
use timetable_engine::server;

#[tokio::main]
async fn main() -> Result<(), timetable_engine::Error> {
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(config::LOG_ENV, config::DEFAULT_LOG_FILTER),
    )
    .init();

    let config = ServerConfig::from_env()?;
    server::run_server(&config).await
}
