//! Ledger error types.

use finbot_shared::AppError;
use finbot_shared::types::CategoryId;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transaction amount cannot be zero.
    #[error("Transaction amount cannot be zero")]
    ZeroAmount,

    /// Category name is empty after trimming.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// Category does not exist for this user.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Storage collaborator failed.
    #[error("Storage error: {0}")]
    Storage(#[from] AppError),
}
