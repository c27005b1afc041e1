//! Telegram webhook endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::post};
use tracing::{error, warn};

use crate::AppState;
use crate::telegram::Update;

/// Decodes an update and hands it to the bot.
///
/// Once the body decodes the answer is always `200 OK`.
async fn receive_update(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(error) => {
            warn!(%error, "Rejected malformed webhook body");
            return StatusCode::BAD_REQUEST;
        }
    };

    let update_id = update.update_id;
    if let Err(error) = state.handler.handle_update(update).await {
        error!(update_id, %error, "Failed to handle update");
    }
    StatusCode::OK
}

/// Creates the webhook route.
pub fn routes(path: &str) -> Router<AppState> {
    Router::new().route(path, post(receive_update))
}
