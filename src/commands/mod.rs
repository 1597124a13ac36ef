//! Command definitions and dispatch.

pub mod favorite;
pub mod schema;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use favhub_core::config::AppConfig;
use favhub_core::error::AppError;
use favhub_database::DatabasePool;
use favhub_database::repositories::FavoriteRepository;
use favhub_service::FavoriteService;

use crate::output::OutputFormat;

/// FavHub: favorite nodes visible through ownership and sharing
#[derive(Debug, Parser)]
#[command(name = "favhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the favorites table if it does not exist
    InitSchema,
    /// Mark a node as a favorite of a user
    Mark(favorite::PathUserArgs),
    /// Remove a node from a user's favorites
    Unmark(favorite::PathUserArgs),
    /// Check whether a node is a favorite of a user
    Check(favorite::CheckArgs),
    /// List a user's visible favorites
    List(favorite::ListArgs),
}

impl Cli {
    /// Execute the command against an initialized database
    pub async fn execute(&self, config: &AppConfig, pool: &DatabasePool) -> Result<(), AppError> {
        match &self.command {
            Commands::InitSchema => schema::execute(pool).await,
            Commands::Mark(args) => favorite::mark(args, &favorite_service(config, pool)).await,
            Commands::Unmark(args) => favorite::unmark(args, &favorite_service(config, pool)).await,
            Commands::Check(args) => {
                favorite::check(args, &favorite_service(config, pool), pool, self.format).await
            }
            Commands::List(args) => {
                favorite::list(args, &favorite_service(config, pool), self.format).await
            }
        }
    }
}

/// Helper: wire the favorite service onto the pool
fn favorite_service(config: &AppConfig, pool: &DatabasePool) -> FavoriteService {
    let repo = FavoriteRepository::new(pool.pool().clone());
    FavoriteService::new(Arc::new(repo), config.favorites.clone())
}
