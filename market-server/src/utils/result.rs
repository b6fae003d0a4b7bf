//! Application result alias

use super::error::AppError;

/// Result type used by handlers and services
pub type AppResult<T> = Result<T, AppError>;
