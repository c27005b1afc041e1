//! HTTP routes served in webhook mode.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod webhook;

/// Health check plus the webhook endpoint at `webhook_path`.
pub fn routes(webhook_path: &str) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(webhook::routes(webhook_path))
}
