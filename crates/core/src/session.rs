//! Per-user dialog state.
//!
//! The bot keeps nothing in process memory between messages: whatever a
//! user is in the middle of lives in a [`UserState`] persisted through a
//! [`SessionStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use finbot_shared::AppResult;
use finbot_shared::types::{CategoryId, UserId};
use serde::{Deserialize, Serialize};

use crate::ledger::CategoryKind;

/// What the next free-text message from the user means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingAction {
    /// `<amount> [description]` for the selected category.
    EnterAmount,
    /// Name of a category to create.
    NewCategory,
}

impl PendingAction {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnterAmount => "enter_amount",
            Self::NewCategory => "new_category",
        }
    }
}

impl std::str::FromStr for PendingAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enter_amount" => Ok(Self::EnterAmount),
            "new_category" => Ok(Self::NewCategory),
            other => Err(format!("unknown pending action: {other}")),
        }
    }
}

/// Dialog state of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    /// Owner of the state.
    pub user_id: UserId,
    /// Category picked for the transaction being entered.
    pub selected_category: Option<CategoryId>,
    /// Income or expense flow.
    pub transaction_kind: Option<CategoryKind>,
    /// What the next text message is expected to be.
    pub awaiting: Option<PendingAction>,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

impl UserState {
    /// State after the user picked a category and must type an amount.
    #[must_use]
    pub fn enter_amount(
        user_id: UserId,
        category_id: CategoryId,
        kind: CategoryKind,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            selected_category: Some(category_id),
            transaction_kind: Some(kind),
            awaiting: Some(PendingAction::EnterAmount),
            updated_at: now,
        }
    }

    /// State after the user asked to create a category of `kind`.
    #[must_use]
    pub fn new_category(user_id: UserId, kind: CategoryKind, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            selected_category: None,
            transaction_kind: Some(kind),
            awaiting: Some(PendingAction::NewCategory),
            updated_at: now,
        }
    }
}

/// Persistence for dialog state.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current state of the user, if any.
    async fn get_user_state(&self, user_id: UserId) -> AppResult<Option<UserState>>;

    /// Inserts or replaces the state of `state.user_id`.
    async fn save_user_state(&self, state: &UserState) -> AppResult<()>;

    /// Clears the state of the user. Clearing a missing state is not an error.
    async fn delete_user_state(&self, user_id: UserId) -> AppResult<()>;
}
