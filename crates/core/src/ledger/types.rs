//! Ledger domain types: transactions and the categories they belong to.
//!
//! Amounts are signed: positive is income, negative is expense. The reports
//! module relies on this convention everywhere.

use chrono::{DateTime, Utc};
use finbot_shared::types::{CategoryId, TransactionId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of a category bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Money going out.
    Expense,
    /// Money coming in.
    Income,
}

impl CategoryKind {
    /// Storage / callback representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }

    /// Returns true for income categories.
    #[must_use]
    pub const fn is_income(self) -> bool {
        matches!(self, Self::Income)
    }
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(format!("unknown category kind: {other}")),
        }
    }
}

/// A user-defined category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Expense or income.
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A recorded income or expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Owning user.
    pub user_id: UserId,
    /// Category the transaction was filed under.
    pub category_id: CategoryId,
    /// Signed amount (positive = income, negative = expense).
    pub amount: Decimal,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Calendar date the transaction counts for.
    pub date: DateTime<Utc>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns true when the amount counts as income.
    #[must_use]
    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// Ordering requested from storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest transaction date first.
    #[default]
    OldestFirst,
    /// Newest transaction date first.
    NewestFirst,
}

/// Filter for transaction queries. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Earliest transaction date.
    pub start_date: Option<DateTime<Utc>>,
    /// Latest transaction date.
    pub end_date: Option<DateTime<Utc>>,
    /// Maximum number of rows.
    pub limit: Option<usize>,
    /// Ordering by transaction date.
    pub order: SortOrder,
}

impl TransactionFilter {
    /// Filter for an inclusive date range.
    #[must_use]
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            ..Self::default()
        }
    }

    /// Filter for the newest `limit` transactions.
    #[must_use]
    pub fn recent(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            order: SortOrder::NewestFirst,
            ..Self::default()
        }
    }
}
