// dyntables server entrypoint

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use dyntables::api::{AppState, serve, shutdown_signal};
use dyntables::config::ServerConfig;
use dyntables::{TableManager, logging};

#[derive(Debug, Parser)]
#[command(name = "dyntables", version, about = "REST API for runtime-defined Postgres tables")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServerConfig::load(&args.config)?;

    logging::init_logging(&config.logging.level, &config.logging.format)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        "Starting dyntables"
    );

    let manager =
        TableManager::connect(&config.database.url, config.database.max_connections).await?;
    let listener = TcpListener::bind(config.bind_addr()).await?;

    serve(listener, AppState::new(manager), shutdown_signal()).await?;
    Ok(())
}
