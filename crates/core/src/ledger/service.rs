//! Ledger service: recording transactions and managing categories.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use finbot_shared::types::{CategoryId, TransactionId, UserId};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::error::LedgerError;
use super::repository::LedgerRepository;
use super::types::{Category, CategoryKind, Transaction, TransactionFilter};
use crate::reports::period::start_of_day;

/// Categories every new user starts with.
pub const DEFAULT_CATEGORIES: [(&str, CategoryKind); 4] = [
    ("Groceries", CategoryKind::Expense),
    ("Transport", CategoryKind::Expense),
    ("Entertainment", CategoryKind::Expense),
    ("Salary", CategoryKind::Income),
];

/// Ledger service over a storage collaborator.
#[derive(Clone)]
pub struct LedgerService {
    repo: Arc<dyn LedgerRepository>,
}

impl LedgerService {
    /// Creates a new ledger service.
    #[must_use]
    pub fn new(repo: Arc<dyn LedgerRepository>) -> Self {
        Self { repo }
    }

    /// Applies the sign convention for an amount typed by the user.
    ///
    /// Users type magnitudes; expenses are stored negative, income positive.
    #[must_use]
    pub fn signed_amount(kind: CategoryKind, raw: Decimal) -> Decimal {
        match kind {
            CategoryKind::Expense => -raw.abs(),
            CategoryKind::Income => raw.abs(),
        }
    }

    /// Records a transaction dated at the local midnight of `now`.
    pub async fn add_transaction(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        amount: Decimal,
        description: &str,
        now: DateTime<Tz>,
    ) -> Result<Transaction, LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }

        let transaction = Transaction {
            id: TransactionId::new(),
            user_id,
            category_id,
            amount,
            description: description.trim().to_string(),
            date: start_of_day(now.date_naive(), &now.timezone()).with_timezone(&Utc),
            created_at: now.with_timezone(&Utc),
        };

        let stored = self.repo.create_transaction(&transaction).await?;
        info!(
            user_id = %user_id,
            transaction_id = %stored.id,
            amount = %stored.amount,
            "Transaction recorded"
        );
        Ok(stored)
    }

    /// Creates the default category set unless the user already has categories.
    ///
    /// Returns the categories that were created (empty when nothing was done).
    pub async fn create_default_categories(
        &self,
        user_id: UserId,
        now: DateTime<Tz>,
    ) -> Result<Vec<Category>, LedgerError> {
        let existing = self.repo.get_categories(user_id).await?;
        if !existing.is_empty() {
            debug!(user_id = %user_id, count = existing.len(), "User already has categories");
            return Ok(Vec::new());
        }

        let mut created = Vec::with_capacity(DEFAULT_CATEGORIES.len());
        for (name, kind) in DEFAULT_CATEGORIES {
            created.push(self.create_category(user_id, name, kind, now).await?);
        }
        info!(user_id = %user_id, count = created.len(), "Default categories created");
        Ok(created)
    }

    /// Lists the user's categories.
    pub async fn categories(&self, user_id: UserId) -> Result<Vec<Category>, LedgerError> {
        Ok(self.repo.get_categories(user_id).await?)
    }

    /// Finds one category of the user.
    pub async fn category(
        &self,
        user_id: UserId,
        category_id: CategoryId,
    ) -> Result<Category, LedgerError> {
        self.repo
            .get_categories(user_id)
            .await?
            .into_iter()
            .find(|c| c.id == category_id)
            .ok_or(LedgerError::CategoryNotFound(category_id))
    }

    /// Creates a category.
    pub async fn create_category(
        &self,
        user_id: UserId,
        name: &str,
        kind: CategoryKind,
        now: DateTime<Tz>,
    ) -> Result<Category, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyCategoryName);
        }

        let category = Category {
            id: CategoryId::new(),
            user_id,
            name: name.to_string(),
            kind,
            created_at: now.with_timezone(&Utc),
        };
        Ok(self.repo.create_category(&category).await?)
    }

    /// Deletes a category and, through storage, its transactions.
    pub async fn delete_category(
        &self,
        user_id: UserId,
        category_id: CategoryId,
    ) -> Result<(), LedgerError> {
        self.repo.delete_category(category_id, user_id).await?;
        info!(user_id = %user_id, category_id = %category_id, "Category deleted");
        Ok(())
    }

    /// The newest `limit` transactions of the user.
    pub async fn recent_transactions(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self
            .repo
            .get_transactions(user_id, &TransactionFilter::recent(limit))
            .await?)
    }

    /// Deletes one transaction.
    pub async fn delete_transaction(
        &self,
        user_id: UserId,
        transaction_id: TransactionId,
    ) -> Result<(), LedgerError> {
        self.repo.delete_transaction(transaction_id, user_id).await?;
        info!(user_id = %user_id, transaction_id = %transaction_id, "Transaction deleted");
        Ok(())
    }

    /// Users with at least one recorded transaction.
    pub async fn users(&self) -> Result<Vec<UserId>, LedgerError> {
        Ok(self.repo.list_users().await?)
    }
}
