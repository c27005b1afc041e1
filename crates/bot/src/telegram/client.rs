//! `reqwest` implementation of [`Messenger`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::json;
use tracing::{debug, warn};

use super::types::{ApiResponse, SendMessage, Update};
use super::{Messenger, TelegramError};

const API_URL: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Bot API client bound to one bot token.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient").finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Client for the public Bot API.
    pub fn new(token: &str) -> Result<Self, TelegramError> {
        Self::with_api_url(API_URL, token)
    }

    /// Client for a Bot API server at `api_url`.
    pub fn with_api_url(api_url: &str, token: &str) -> Result<Self, TelegramError> {
        if token.trim().is_empty() {
            return Err(TelegramError::Configuration("bot token is empty".to_string()));
        }
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TelegramError::Configuration(e.to_string()))?;
        Ok(Self {
            http,
            base_url: format!("{}/bot{token}", api_url.trim_end_matches('/')),
        })
    }

    async fn call<B, T>(
        &self,
        method: &'static str,
        body: &B,
        timeout: Duration,
    ) -> Result<T, TelegramError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}/{method}", self.base_url))
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                warn!(method, error = %e, "Telegram request failed");
                TelegramError::Transport {
                    method,
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| TelegramError::Transport {
            method,
            message: e.without_url().to_string(),
        })?;

        let envelope: ApiResponse<T> = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::Api {
                    method,
                    code: Some(i64::from(status.as_u16())),
                    description: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }
            Err(e) => {
                return Err(TelegramError::Decode {
                    method,
                    message: e.to_string(),
                });
            }
        };

        if !envelope.ok {
            let description = envelope
                .description
                .unwrap_or_else(|| status.to_string());
            warn!(method, code = ?envelope.error_code, %description, "Telegram rejected request");
            return Err(TelegramError::Api {
                method,
                code: envelope.error_code,
                description,
            });
        }

        debug!(method, "Telegram request succeeded");
        envelope.result.ok_or_else(|| TelegramError::Decode {
            method,
            message: "missing result".to_string(),
        })
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(&self, message: SendMessage) -> Result<(), TelegramError> {
        self.call::<_, IgnoredAny>("sendMessage", &message, REQUEST_TIMEOUT)
            .await
            .map(drop)
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TelegramError> {
        self.call::<_, IgnoredAny>(
            "answerCallbackQuery",
            &json!({ "callback_query_id": callback_id }),
            REQUEST_TIMEOUT,
        )
        .await
        .map(drop)
    }

    async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let body = json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        self.call(
            "getUpdates",
            &body,
            Duration::from_secs(timeout_secs) + POLL_GRACE,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_embeds_token() {
        let client = TelegramClient::with_api_url("http://localhost:8081/", "123:abc").unwrap();
        assert_eq!(client.base_url, "http://localhost:8081/bot123:abc");
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            TelegramClient::new("  "),
            Err(TelegramError::Configuration(_))
        ));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = TelegramClient::new("123:secret").unwrap();
        assert!(!format!("{client:?}").contains("secret"));
    }
}
