//! Dialog state table.
//!
//! Rows keep plain text columns; empty strings and nulls both mean "unset".

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use finbot_core::ledger::CategoryKind;
use finbot_core::session::{PendingAction, SessionStore, UserState};
use finbot_shared::types::{CategoryId, UserId};
use finbot_shared::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{SupabaseRepository, USER_STATES, query};

/// Row of the `user_states` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStateRow {
    /// Telegram user id, unique.
    pub user_id: UserId,
    /// Selected category id.
    #[serde(default)]
    pub selected_category_id: Option<String>,
    /// `income` or `expense`.
    #[serde(default)]
    pub transaction_type: Option<String>,
    /// Pending free-text action.
    #[serde(default)]
    pub awaiting_action: Option<String>,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

impl From<&UserState> for UserStateRow {
    fn from(state: &UserState) -> Self {
        Self {
            user_id: state.user_id,
            selected_category_id: state.selected_category.map(|id| id.to_string()),
            transaction_type: state.transaction_kind.map(|kind| kind.as_str().to_string()),
            awaiting_action: state.awaiting.map(|action| action.as_str().to_string()),
            updated_at: state.updated_at,
        }
    }
}

impl TryFrom<UserStateRow> for UserState {
    type Error = AppError;

    fn try_from(row: UserStateRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.user_id,
            selected_category: parse_column::<CategoryId>(row.selected_category_id, "selected_category_id")?,
            transaction_kind: parse_column::<CategoryKind>(row.transaction_type, "transaction_type")?,
            awaiting: parse_column::<PendingAction>(row.awaiting_action, "awaiting_action")?,
            updated_at: row.updated_at,
        })
    }
}

fn parse_column<T>(value: Option<String>, column: &str) -> AppResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| AppError::Internal(format!("{USER_STATES}.{column}: {e}"))),
    }
}

#[async_trait]
impl SessionStore for SupabaseRepository {
    async fn get_user_state(&self, user_id: UserId) -> AppResult<Option<UserState>> {
        let mut filter = query::by_user(user_id);
        filter.insert(0, ("select", "*".to_string()));
        let rows: Vec<UserStateRow> = self.client.select(USER_STATES, &filter).await?;
        rows.into_iter().next().map(UserState::try_from).transpose()
    }

    async fn save_user_state(&self, state: &UserState) -> AppResult<()> {
        self.client
            .upsert(USER_STATES, &UserStateRow::from(state), "user_id")
            .await?;
        debug!(user_id = %state.user_id, awaiting = ?state.awaiting, "User state saved");
        Ok(())
    }

    async fn delete_user_state(&self, user_id: UserId) -> AppResult<()> {
        self.client
            .delete(USER_STATES, &query::by_user(user_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(category: Option<&str>, kind: Option<&str>, action: Option<&str>) -> UserStateRow {
        UserStateRow {
            user_id: UserId(9),
            selected_category_id: category.map(String::from),
            transaction_type: kind.map(String::from),
            awaiting_action: action.map(String::from),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_state_survives_row_mapping() {
        let state = UserState::enter_amount(UserId(9), CategoryId::new(), CategoryKind::Income, Utc::now());
        let back = UserState::try_from(UserStateRow::from(&state)).unwrap();
        assert_eq!(back, state);
    }

    #[rstest]
    #[case(row(Some(""), Some(""), Some("")))]
    #[case(row(None, None, None))]
    #[case(row(Some("  "), None, Some("")))]
    fn test_blank_columns_are_unset(#[case] input: UserStateRow) {
        let state = UserState::try_from(input).unwrap();
        assert!(state.selected_category.is_none());
        assert!(state.transaction_kind.is_none());
        assert!(state.awaiting.is_none());
    }

    #[test]
    fn test_new_category_row_without_category() {
        let state = UserState::try_from(row(Some(""), Some("expense"), Some("new_category"))).unwrap();
        assert_eq!(state.awaiting, Some(PendingAction::NewCategory));
        assert_eq!(state.transaction_kind, Some(CategoryKind::Expense));
    }

    #[test]
    fn test_garbage_column_is_internal_error() {
        let err = UserState::try_from(row(Some("not-a-uuid"), None, None)).unwrap_err();
        assert!(matches!(err, AppError::Internal(msg) if msg.contains("selected_category_id")));
    }

    #[test]
    fn test_row_json_uses_column_names() {
        let json = serde_json::to_value(row(None, Some("income"), Some("new_category"))).unwrap();
        assert_eq!(json["user_id"], 9);
        assert_eq!(json["transaction_type"], "income");
        assert!(json["selected_category_id"].is_null());
    }
}
