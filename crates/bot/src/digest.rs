//! Daily digest: a short daily report pushed to every known user.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Days, TimeDelta, TimeZone};
use chrono_tz::Tz;
use finbot_core::ledger::LedgerError;
use finbot_core::reports::{ReportError, ReportKind};
use finbot_shared::types::UserId;
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::handler::BotHandler;
use crate::keyboard;
use crate::render;
use crate::telegram::{SendMessage, TelegramError};

/// Users served at the same time.
pub const DIGEST_CONCURRENCY: usize = 8;

/// Outcome of one digest run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DigestSummary {
    /// Users that received the digest.
    pub sent: usize,
    /// Users whose digest failed.
    pub failed: usize,
}

#[derive(Debug, Error)]
enum DigestError {
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Telegram(#[from] TelegramError),
}

impl BotHandler {
    /// Sends today's digest to every user with transactions.
    ///
    /// A failure for one user is logged and counted; it does not stop the
    /// others.
    #[instrument(skip(self))]
    pub async fn send_daily_digest(&self) -> Result<DigestSummary, LedgerError> {
        let users = self.ledger.users().await?;
        let now = self.now();
        let sent = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        stream::iter(users)
            .for_each_concurrent(DIGEST_CONCURRENCY, |user| {
                let (sent, failed) = (&sent, &failed);
                async move {
                    match self.send_digest_to(user, now).await {
                        Ok(()) => {
                            sent.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(error) => {
                            warn!(user_id = %user, %error, "Daily digest failed");
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            })
            .await;

        Ok(DigestSummary {
            sent: sent.into_inner(),
            failed: failed.into_inner(),
        })
    }

    async fn send_digest_to(&self, user: UserId, now: DateTime<Tz>) -> Result<(), DigestError> {
        let report = self.reports.get_report(user, ReportKind::Daily, now).await?;
        self.messenger
            .send_message(
                SendMessage::new(user.get(), render::daily_digest(&report))
                    .markdown()
                    .keyboard(keyboard::digest()),
            )
            .await?;
        Ok(())
    }
}

/// First `hour:00` local time strictly after `now`.
///
/// Days on which that wall-clock time does not exist are skipped.
#[must_use]
pub fn next_run(now: DateTime<Tz>, hour: u32) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();
    (0..=2)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .filter_map(|day| day.and_hms_opt(hour, 0, 0))
        .filter_map(|local| tz.from_local_datetime(&local).earliest())
        .find(|candidate| *candidate > now)
        .unwrap_or_else(|| now + TimeDelta::days(1))
}

/// Runs the digest every day at `hour` local time. Never returns.
pub async fn run_daily_digest(handler: Arc<BotHandler>, hour: u32) {
    loop {
        let now = handler.now();
        let next = next_run(now, hour);
        info!(next = %next, "Next daily digest scheduled");
        tokio::time::sleep((next - now).to_std().unwrap_or_default()).await;

        match handler.send_daily_digest().await {
            Ok(summary) => info!(
                sent = summary.sent,
                failed = summary.failed,
                "Daily digest finished"
            ),
            Err(error) => error!(%error, "Daily digest could not list users"),
        }
    }
}
