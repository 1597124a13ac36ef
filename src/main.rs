//! FavHub: favorite node resolution over a shared node store.
//!
//! Entry point that loads configuration, initializes logging, bootstraps the
//! favorite index, and dispatches the requested command.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use favhub_core::config::{AppConfig, LoggingConfig};
use favhub_core::error::AppError;
use favhub_database::DatabasePool;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    let pool = match bootstrap(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            std::process::exit(1);
        }
    };

    let result = cli.execute(&config, &pool).await;
    pool.close().await;

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Connect to the database and make sure the favorite index exists.
///
/// Any failure here stops the process before a command runs.
async fn bootstrap(config: &AppConfig) -> Result<DatabasePool, AppError> {
    tracing::info!("Starting FavHub v{}", env!("CARGO_PKG_VERSION"));

    let pool = DatabasePool::connect(&config.database).await?;
    favhub_database::schema::init_favorites(pool.pool()).await?;

    Ok(pool)
}
