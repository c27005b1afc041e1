//! Ledger tables.

use std::collections::BTreeSet;

use async_trait::async_trait;
use finbot_core::ledger::{Category, LedgerRepository, Transaction, TransactionFilter};
use finbot_shared::AppResult;
use finbot_shared::types::{CategoryId, TransactionId, UserId};
use serde::Deserialize;
use tracing::{debug, info};

use super::{CATEGORIES, SupabaseRepository, TRANSACTIONS, query};

#[derive(Debug, Deserialize)]
struct UserIdRow {
    user_id: UserId,
}

#[async_trait]
impl LedgerRepository for SupabaseRepository {
    async fn create_category(&self, category: &Category) -> AppResult<Category> {
        let stored: Category = self.client.insert(CATEGORIES, category).await?;
        info!(user_id = %stored.user_id, category_id = %stored.id, name = %stored.name, "Category created");
        Ok(stored)
    }

    async fn get_categories(&self, user_id: UserId) -> AppResult<Vec<Category>> {
        let mut filter = query::by_user(user_id);
        filter.insert(0, ("select", "*".to_string()));
        self.client.select(CATEGORIES, &filter).await
    }

    async fn delete_category(&self, id: CategoryId, user_id: UserId) -> AppResult<()> {
        // Transactions first so no row is left pointing at a missing category.
        let mut related = query::by_user(user_id);
        related.push(("category_id", query::eq(id)));
        self.client.delete(TRANSACTIONS, &related).await?;

        self.client
            .delete(CATEGORIES, &query::by_id(id, user_id))
            .await?;
        info!(user_id = %user_id, category_id = %id, "Category and its transactions deleted");
        Ok(())
    }

    async fn create_transaction(&self, transaction: &Transaction) -> AppResult<Transaction> {
        self.client.insert(TRANSACTIONS, transaction).await
    }

    async fn get_transactions(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> AppResult<Vec<Transaction>> {
        let rows: Vec<Transaction> = self
            .client
            .select(TRANSACTIONS, &query::transactions(user_id, filter))
            .await?;
        debug!(user_id = %user_id, count = rows.len(), "Transactions fetched");
        Ok(rows)
    }

    async fn delete_transaction(&self, id: TransactionId, user_id: UserId) -> AppResult<()> {
        self.client
            .delete(TRANSACTIONS, &query::by_id(id, user_id))
            .await
    }

    async fn list_users(&self) -> AppResult<Vec<UserId>> {
        let filter = vec![
            ("select", "user_id".to_string()),
            ("user_id", "not.is.null".to_string()),
        ];
        let rows: Vec<UserIdRow> = self.client.select(TRANSACTIONS, &filter).await?;
        let users: BTreeSet<UserId> = rows.into_iter().map(|row| row.user_id).collect();
        Ok(users.into_iter().collect())
    }
}
