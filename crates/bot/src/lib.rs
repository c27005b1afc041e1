//! Telegram transport for Finbot.
//!
//! This crate provides:
//! - A Bot API client behind the [`telegram::Messenger`] trait
//! - Update dispatch and the dialog flow ([`BotHandler`])
//! - Keyboards and message texts
//! - Webhook routes, long polling and the daily digest

pub mod callback;
pub mod digest;
pub mod handler;
pub mod keyboard;
pub mod polling;
pub mod render;
pub mod routes;
pub mod telegram;

pub use handler::{BotError, BotHandler};
pub use polling::Poller;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Update handler.
    pub handler: Arc<BotHandler>,
}

/// Creates the webhook-mode router.
pub fn create_router(state: AppState, webhook_path: &str) -> Router {
    Router::new()
        .merge(routes::routes(webhook_path))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
