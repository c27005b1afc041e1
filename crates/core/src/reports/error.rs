//! Report error types.

use finbot_shared::AppError;
use thiserror::Error;

/// Errors that can occur while building a report.
///
/// Only storage failures end up here; arithmetic edge cases degrade to
/// zeros instead of failing the report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Fetching the current window failed.
    #[error("failed to get current period transactions: {0}")]
    CurrentTransactions(#[source] AppError),

    /// Fetching the comparison window failed.
    #[error("failed to get previous period transactions: {0}")]
    PreviousTransactions(#[source] AppError),

    /// Fetching categories failed.
    #[error("failed to get categories: {0}")]
    Categories(#[source] AppError),
}

impl ReportError {
    /// The storage error behind this failure.
    #[must_use]
    pub fn storage_error(&self) -> &AppError {
        match self {
            Self::CurrentTransactions(e) | Self::PreviousTransactions(e) | Self::Categories(e) => e,
        }
    }
}
