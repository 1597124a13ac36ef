//! Favorite index bootstrap.
//!
//! The `nodes`, `users`, and `shares` tables belong to other components and
//! must already exist. Only the `favorites` relation is created here, and
//! creation is idempotent. Callers treat a failure as fatal at startup.

use sqlx::PgPool;
use tracing::{debug, error, info};

use favhub_core::error::{AppError, ErrorKind};
use favhub_core::result::AppResult;

const CREATE_FAVORITES: &str = "\
CREATE TABLE IF NOT EXISTS favorites ( \
    nodeid BIGINT NOT NULL REFERENCES nodes (nodeid) ON DELETE CASCADE, \
    username TEXT NOT NULL REFERENCES users (username) ON DELETE CASCADE, \
    CONSTRAINT favorites_nodeid_username_key UNIQUE (nodeid, username) \
)";

const CREATE_FAVORITES_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS favorites_username_idx ON favorites (username)";

/// Create the `favorites` table and its lookup index if absent.
pub async fn init_favorites(pool: &PgPool) -> AppResult<()> {
    for statement in [CREATE_FAVORITES, CREATE_FAVORITES_USER_INDEX] {
        sqlx::query(statement).execute(pool).await.map_err(|e| {
            error!(error = %e, "Failed to initialize 'favorites' table");
            AppError::with_source(
                ErrorKind::Database,
                "Failed to initialize 'favorites' table",
                e,
            )
        })?;
    }

    debug!("Initialized 'favorites' table");
    info!("Favorite index ready");
    Ok(())
}
