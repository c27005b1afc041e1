//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Failures of the collaborators the domain talks to.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage backend rejected or failed the request.
    #[error("Database error: {0}")]
    Database(String),

    /// External service error (network, Telegram, storage transport).
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
