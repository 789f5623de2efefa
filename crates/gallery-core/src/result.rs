//! Convenience result type alias for Gallery.

use crate::error::AppError;

/// A specialized `Result` type for Gallery operations.
pub type AppResult<T> = Result<T, AppError>;
