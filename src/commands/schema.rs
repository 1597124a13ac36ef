//! Favorite index bootstrap command.

use favhub_core::error::AppError;
use favhub_database::DatabasePool;

use crate::output;

/// Re-run the idempotent bootstrap and confirm connectivity.
pub async fn execute(pool: &DatabasePool) -> Result<(), AppError> {
    favhub_database::schema::init_favorites(pool.pool()).await?;
    if !pool.health_check().await? {
        return Err(AppError::database("Database health check returned an unexpected value"));
    }
    output::print_success("Favorite index ready");
    Ok(())
}
