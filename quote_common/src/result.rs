//! Result type alias shared across the workspace.
//!
//! Defaults the error type to [`AppError`], so pipeline stages simply return `Result<T>`.
use crate::error::AppError;

/// Workspace-wide `Result` alias with `AppError` as the default error.
pub type Result<T, E = AppError> = std::result::Result<T, E>;
