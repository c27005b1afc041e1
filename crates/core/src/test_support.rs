//! In-memory fakes and fixtures shared by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use finbot_shared::types::{CategoryId, TransactionId, UserId};
use finbot_shared::{AppError, AppResult};
use rust_decimal::Decimal;

use crate::ledger::{
    Category, CategoryKind, LedgerRepository, SortOrder, Transaction, TransactionFilter,
};
use crate::session::{SessionStore, UserState};

/// The given wall-clock time in `tz`.
pub fn local_at(tz: Tz, y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
    tz.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// Noon UTC of the given date, in the report time zone type.
pub fn local(y: i32, m: u32, d: u32) -> DateTime<Tz> {
    local_at(chrono_tz::UTC, y, m, d, 12, 0)
}

/// A category owned by nobody in particular.
pub fn category(name: &str, kind: CategoryKind) -> Category {
    Category {
        id: CategoryId::new(),
        user_id: UserId(0),
        name: name.to_string(),
        kind,
        created_at: Utc::now(),
    }
}

/// A transaction dated at UTC midnight of the given date.
pub fn transaction_on(category: &Category, amount: Decimal, y: i32, m: u32, d: u32) -> Transaction {
    let date = NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc();
    Transaction {
        id: TransactionId::new(),
        user_id: category.user_id,
        category_id: category.id,
        amount,
        description: String::new(),
        date,
        created_at: date,
    }
}

/// Mock storage for testing.
#[derive(Default)]
pub struct MemoryRepository {
    categories: Mutex<Vec<Category>>,
    transactions: Mutex<Vec<Transaction>>,
    states: Mutex<HashMap<UserId, UserState>>,
    fail_categories: AtomicBool,
    fail_transactions: AtomicBool,
}

impl MemoryRepository {
    pub fn insert_category(&self, user_id: UserId, mut category: Category) {
        category.user_id = user_id;
        self.categories.lock().unwrap().push(category);
    }

    pub fn insert_transaction(&self, user_id: UserId, mut transaction: Transaction) {
        transaction.user_id = user_id;
        self.transactions.lock().unwrap().push(transaction);
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.lock().unwrap().clone()
    }

    pub fn fail_categories(&self, fail: bool) {
        self.fail_categories.store(fail, Ordering::SeqCst);
    }

    pub fn fail_transactions(&self, fail: bool) {
        self.fail_transactions.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool) -> AppResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(AppError::Database("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerRepository for MemoryRepository {
    async fn create_category(&self, category: &Category) -> AppResult<Category> {
        Self::check(&self.fail_categories)?;
        self.categories.lock().unwrap().push(category.clone());
        Ok(category.clone())
    }

    async fn get_categories(&self, user_id: UserId) -> AppResult<Vec<Category>> {
        Self::check(&self.fail_categories)?;
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_category(&self, id: CategoryId, user_id: UserId) -> AppResult<()> {
        Self::check(&self.fail_categories)?;
        self.categories
            .lock()
            .unwrap()
            .retain(|c| !(c.id == id && c.user_id == user_id));
        self.transactions
            .lock()
            .unwrap()
            .retain(|t| !(t.category_id == id && t.user_id == user_id));
        Ok(())
    }

    async fn create_transaction(&self, transaction: &Transaction) -> AppResult<Transaction> {
        Self::check(&self.fail_transactions)?;
        self.transactions.lock().unwrap().push(transaction.clone());
        Ok(transaction.clone())
    }

    async fn get_transactions(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> AppResult<Vec<Transaction>> {
        Self::check(&self.fail_transactions)?;
        let mut rows: Vec<Transaction> = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .filter(|t| filter.start_date.is_none_or(|start| t.date >= start))
            .filter(|t| filter.end_date.is_none_or(|end| t.date <= end))
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.date);
        if filter.order == SortOrder::NewestFirst {
            rows.reverse();
        }
        if let Some(limit) = filter.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn delete_transaction(&self, id: TransactionId, user_id: UserId) -> AppResult<()> {
        Self::check(&self.fail_transactions)?;
        self.transactions
            .lock()
            .unwrap()
            .retain(|t| !(t.id == id && t.user_id == user_id));
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<UserId>> {
        let mut users: Vec<UserId> = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.user_id)
            .collect();
        users.sort_unstable();
        users.dedup();
        Ok(users)
    }
}

#[async_trait]
impl SessionStore for MemoryRepository {
    async fn get_user_state(&self, user_id: UserId) -> AppResult<Option<UserState>> {
        Ok(self.states.lock().unwrap().get(&user_id).cloned())
    }

    async fn save_user_state(&self, state: &UserState) -> AppResult<()> {
        self.states
            .lock()
            .unwrap()
            .insert(state.user_id, state.clone());
        Ok(())
    }

    async fn delete_user_state(&self, user_id: UserId) -> AppResult<()> {
        self.states.lock().unwrap().remove(&user_id);
        Ok(())
    }
}
