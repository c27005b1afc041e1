//! Telegram Bot API collaborator.

mod client;
mod types;

pub use client::TelegramClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors talking to the Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Request never got an answer.
    #[error("telegram request {method} failed: {message}")]
    Transport {
        /// API method.
        method: &'static str,
        /// Underlying error text.
        message: String,
    },

    /// The API answered `ok: false` or a non-2xx status.
    #[error("telegram rejected {method}: {description}")]
    Api {
        /// API method.
        method: &'static str,
        /// Error code reported by the API, if any.
        code: Option<i64>,
        /// Error text reported by the API.
        description: String,
    },

    /// Answer could not be decoded.
    #[error("telegram {method} returned an unexpected body: {message}")]
    Decode {
        /// API method.
        method: &'static str,
        /// Decoder error text.
        message: String,
    },

    /// Client could not be built.
    #[error("telegram client configuration error: {0}")]
    Configuration(String),
}

/// Outgoing side of the bot: everything the handler asks of Telegram.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends a message.
    async fn send_message(&self, message: SendMessage) -> Result<(), TelegramError>;

    /// Stops the loading indicator of a pressed button.
    async fn answer_callback(&self, callback_id: &str) -> Result<(), TelegramError>;

    /// Long-polls for updates after `offset`.
    async fn get_updates(&self, offset: i64, timeout_secs: u64)
    -> Result<Vec<Update>, TelegramError>;
}
