//! Fakes shared by the bot integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use finbot_bot::BotHandler;
use finbot_bot::telegram::{
    CallbackQuery, Chat, Message, Messenger, SendMessage, TelegramError, Update, User,
};
use finbot_core::ledger::{
    Category, CategoryKind, LedgerRepository, SortOrder, Transaction, TransactionFilter,
};
use finbot_core::session::{SessionStore, UserState};
use finbot_shared::types::{CategoryId, TransactionId, UserId};
use finbot_shared::{AppError, AppResult};

pub const USER: i64 = 4242;

/// Ledger and session storage in memory.
#[derive(Default)]
pub struct MemoryStore {
    pub categories: Mutex<Vec<Category>>,
    pub transactions: Mutex<Vec<Transaction>>,
    pub states: Mutex<HashMap<UserId, UserState>>,
    pub failing_reports: Mutex<HashSet<UserId>>,
}

impl MemoryStore {
    pub fn add_category(&self, user: i64, name: &str, kind: CategoryKind) -> Category {
        let category = Category {
            id: CategoryId::new(),
            user_id: UserId(user),
            name: name.to_string(),
            kind,
            created_at: Utc::now(),
        };
        self.categories.lock().unwrap().push(category.clone());
        category
    }

    pub fn state(&self, user: i64) -> Option<UserState> {
        self.states.lock().unwrap().get(&UserId(user)).cloned()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.lock().unwrap().clone()
    }

    pub fn category_names(&self, user: i64) -> Vec<String> {
        self.categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == UserId(user))
            .map(|c| c.name.clone())
            .collect()
    }

    /// Makes transaction queries of `user` fail.
    pub fn fail_reports_for(&self, user: i64) {
        self.failing_reports.lock().unwrap().insert(UserId(user));
    }
}

#[async_trait]
impl LedgerRepository for MemoryStore {
    async fn create_category(&self, category: &Category) -> AppResult<Category> {
        self.categories.lock().unwrap().push(category.clone());
        Ok(category.clone())
    }

    async fn get_categories(&self, user_id: UserId) -> AppResult<Vec<Category>> {
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
        self.transactions
            .lock()
            .unwrap()
            .retain(|t| !(t.category_id == id && t.user_id == user_id));
        self.categories
            .lock()
            .unwrap()
            .retain(|c| !(c.id == id && c.user_id == user_id));
        Ok(())
    }

    async fn create_transaction(&self, transaction: &Transaction) -> AppResult<Transaction> {
        self.transactions.lock().unwrap().push(transaction.clone());
        Ok(transaction.clone())
    }

    async fn get_transactions(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> AppResult<Vec<Transaction>> {
        if self.failing_reports.lock().unwrap().contains(&user_id) {
            return Err(AppError::Database("transactions: 503 unavailable".to_string()));
        }
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
impl SessionStore for MemoryStore {
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

/// Records outgoing calls; serves queued update batches.
#[derive(Default)]
pub struct RecordingMessenger {
    pub sent: Mutex<Vec<SendMessage>>,
    pub answered: Mutex<Vec<String>>,
    pub batches: Mutex<VecDeque<Result<Vec<Update>, TelegramError>>>,
    pub offsets: Mutex<Vec<i64>>,
    pub unreachable_chats: Mutex<HashSet<i64>>,
}

impl RecordingMessenger {
    pub fn sent(&self) -> Vec<SendMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> SendMessage {
        self.sent().pop().expect("no message was sent")
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_message(&self, message: SendMessage) -> Result<(), TelegramError> {
        if self.unreachable_chats.lock().unwrap().contains(&message.chat_id) {
            return Err(TelegramError::Api {
                method: "sendMessage",
                code: Some(403),
                description: "Forbidden: bot was blocked by the user".to_string(),
            });
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TelegramError> {
        self.answered.lock().unwrap().push(callback_id.to_string());
        Ok(())
    }

    async fn get_updates(
        &self,
        offset: i64,
        _timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        self.offsets.lock().unwrap().push(offset);
        self.batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub messenger: Arc<RecordingMessenger>,
    pub handler: Arc<BotHandler>,
}

pub fn harness() -> Harness {
    let store = Arc::new(MemoryStore::default());
    let messenger = Arc::new(RecordingMessenger::default());
    let handler = Arc::new(BotHandler::new(
        store.clone(),
        store.clone(),
        messenger.clone(),
        chrono_tz::UTC,
    ));
    Harness {
        store,
        messenger,
        handler,
    }
}

fn user(id: i64) -> User {
    User {
        id,
        is_bot: false,
        first_name: "Test".to_string(),
        username: None,
    }
}

/// A text message from `from` in their private chat.
pub fn text(update_id: i64, from: i64, text: &str) -> Update {
    Update {
        update_id,
        message: Some(Message {
            message_id: update_id,
            from: Some(user(from)),
            chat: Chat { id: from },
            text: Some(text.to_string()),
        }),
        callback_query: None,
    }
}

/// A button press by `from` carrying `data`.
pub fn callback(update_id: i64, from: i64, data: &str) -> Update {
    Update {
        update_id,
        message: None,
        callback_query: Some(CallbackQuery {
            id: format!("cb-{update_id}"),
            from: user(from),
            message: Some(Message {
                message_id: update_id,
                from: None,
                chat: Chat { id: from },
                text: None,
            }),
            data: Some(data.to_string()),
        }),
    }
}
