//! Storage layer over a PostgREST (Supabase) backend.
//!
//! This crate provides:
//! - A thin PostgREST client with error mapping
//! - Repository implementations of the core storage traits
//! - Row types for tables whose shape differs from the domain types

pub mod client;
pub mod repositories;

pub use client::SupabaseClient;
pub use repositories::SupabaseRepository;

use finbot_shared::AppResult;
use finbot_shared::config::SupabaseConfig;

/// Creates a repository for the configured backend.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built from the configuration.
pub fn connect(config: &SupabaseConfig) -> AppResult<SupabaseRepository> {
    Ok(SupabaseRepository::new(SupabaseClient::new(config)?))
}
