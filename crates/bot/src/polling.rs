//! Long-polling transport.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::handler::BotHandler;
use crate::telegram::TelegramError;

const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Pulls updates with `getUpdates` and feeds them to the handler.
pub struct Poller {
    handler: Arc<BotHandler>,
    timeout_secs: u64,
}

impl Poller {
    /// Creates a poller waiting up to `timeout_secs` per request.
    #[must_use]
    pub fn new(handler: Arc<BotHandler>, timeout_secs: u64) -> Self {
        Self {
            handler,
            timeout_secs,
        }
    }

    /// Fetches and handles one batch. Returns the offset for the next call.
    ///
    /// Handler failures are logged; only a failed fetch is an error.
    pub async fn poll_once(&self, offset: i64) -> Result<i64, TelegramError> {
        let updates = self
            .handler
            .messenger()
            .get_updates(offset, self.timeout_secs)
            .await?;

        let mut next = offset;
        for update in updates {
            let update_id = update.update_id;
            next = next.max(update_id + 1);
            if let Err(error) = self.handler.handle_update(update).await {
                error!(update_id, %error, "Failed to handle update");
            }
        }
        Ok(next)
    }

    /// Polls forever.
    pub async fn run(&self) {
        info!(timeout_secs = self.timeout_secs, "Long polling started");
        let mut offset = 0;
        loop {
            match self.poll_once(offset).await {
                Ok(next) => offset = next,
                Err(error) => {
                    warn!(%error, "getUpdates failed, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }
}
