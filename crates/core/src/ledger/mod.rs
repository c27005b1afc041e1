//! Ledger: transactions, categories and the service that records them.
//!
//! - Domain types with the signed-amount convention
//! - Repository trait implemented by the storage collaborator
//! - Ledger service for recording and housekeeping
//! - Error types for ledger operations

pub mod error;
pub mod repository;
pub mod service;
pub mod types;

pub use error::LedgerError;
pub use repository::LedgerRepository;
pub use service::{DEFAULT_CATEGORIES, LedgerService};
pub use types::{Category, CategoryKind, SortOrder, Transaction, TransactionFilter};
