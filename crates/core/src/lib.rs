//! Core business logic for Finbot.
//!
//! This crate contains pure business logic with ZERO transport or storage
//! dependencies. Storage is reached only through the repository traits
//! defined here.
//!
//! # Modules
//!
//! - `ledger` - Transactions, categories and the signed-amount convention
//! - `reports` - Period resolution, aggregation, trends and comparisons
//! - `session` - Per-user dialog state persisted between messages

pub mod ledger;
pub mod reports;
pub mod session;

#[cfg(test)]
mod test_support;
