//! Convenience result type alias for FavHub.

use crate::error::AppError;

/// A specialized `Result` type for FavHub operations.
pub type AppResult<T> = Result<T, AppError>;
