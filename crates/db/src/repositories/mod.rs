//! Repository implementations backed by PostgREST.
//!
//! One [`SupabaseRepository`] serves both core storage seams: the ledger
//! tables and the per-user dialog state.

pub mod ledger;
pub mod query;
pub mod session;

pub use session::UserStateRow;

use crate::client::SupabaseClient;

/// Table holding categories.
pub const CATEGORIES: &str = "categories";
/// Table holding transactions.
pub const TRANSACTIONS: &str = "transactions";
/// Table holding dialog state, one row per user.
pub const USER_STATES: &str = "user_states";

/// Storage repository for ledger data and dialog state.
#[derive(Debug, Clone)]
pub struct SupabaseRepository {
    client: SupabaseClient,
}

impl SupabaseRepository {
    /// Creates a new repository.
    #[must_use]
    pub const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}
