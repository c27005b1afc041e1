//! Storage seams consumed by the ledger and report services.

use async_trait::async_trait;
use finbot_shared::AppResult;
use finbot_shared::types::{CategoryId, TransactionId, UserId};

use super::types::{Category, Transaction, TransactionFilter};

/// Persistence for categories and transactions.
///
/// Implementations return rows in whatever order the filter asks for; the
/// report engine re-filters defensively and never relies on it.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Inserts a category and returns the stored row.
    async fn create_category(&self, category: &Category) -> AppResult<Category>;

    /// Lists all categories of a user.
    async fn get_categories(&self, user_id: UserId) -> AppResult<Vec<Category>>;

    /// Deletes a category together with its transactions.
    async fn delete_category(&self, id: CategoryId, user_id: UserId) -> AppResult<()>;

    /// Inserts a transaction and returns the stored row.
    async fn create_transaction(&self, transaction: &Transaction) -> AppResult<Transaction>;

    /// Lists transactions of a user matching the filter.
    async fn get_transactions(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> AppResult<Vec<Transaction>>;

    /// Deletes one transaction.
    async fn delete_transaction(&self, id: TransactionId, user_id: UserId) -> AppResult<()>;

    /// Every user that has recorded at least one transaction.
    async fn list_users(&self) -> AppResult<Vec<UserId>>;
}
