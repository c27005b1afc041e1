//! Update dispatch and the dialog flow.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use finbot_core::ledger::{CategoryKind, LedgerError, LedgerRepository, LedgerService};
use finbot_core::reports::{ReportKind, ReportService};
use finbot_core::session::{PendingAction, SessionStore, UserState};
use finbot_shared::AppError;
use finbot_shared::types::{CategoryId, UserId};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::callback::Callback;
use crate::keyboard;
use crate::render;
use crate::telegram::{CallbackQuery, Message, Messenger, SendMessage, TelegramError, Update};

/// Transactions listed in the history view.
pub const RECENT_TRANSACTIONS: usize = 10;

/// Failures that abort handling of an update.
///
/// Ledger and report failures are reported to the user instead and never
/// show up here.
#[derive(Debug, Error)]
pub enum BotError {
    /// Telegram refused or never received a call.
    #[error(transparent)]
    Telegram(#[from] TelegramError),

    /// Dialog state could not be read or written.
    #[error("session storage failed: {0}")]
    Session(#[source] AppError),
}

/// Who an update came from and where to answer.
#[derive(Debug, Clone, Copy)]
struct Origin {
    user: UserId,
    chat: i64,
}

/// Splits `"<amount> [description]"`. A comma is accepted as the decimal
/// separator.
#[must_use]
pub fn parse_amount(text: &str) -> Option<(Decimal, &str)> {
    let text = text.trim();
    let (number, description) = text
        .split_once(char::is_whitespace)
        .unwrap_or((text, ""));
    let amount = Decimal::from_str(&number.replace(',', ".")).ok()?;
    Some((amount, description.trim()))
}

fn failure_text(context: &str, error: &LedgerError) -> String {
    match error {
        LedgerError::Storage(_) => context.to_string(),
        other => format!("{context}: {other}"),
    }
}

/// Handles every update the bot receives.
pub struct BotHandler {
    pub(crate) ledger: LedgerService,
    pub(crate) reports: ReportService,
    pub(crate) sessions: Arc<dyn SessionStore>,
    pub(crate) messenger: Arc<dyn Messenger>,
    pub(crate) tz: Tz,
}

impl BotHandler {
    /// Creates a handler answering in `tz`.
    pub fn new(
        repo: Arc<dyn LedgerRepository>,
        sessions: Arc<dyn SessionStore>,
        messenger: Arc<dyn Messenger>,
        tz: Tz,
    ) -> Self {
        Self {
            ledger: LedgerService::new(repo.clone()),
            reports: ReportService::new(repo),
            sessions,
            messenger,
            tz,
        }
    }

    /// Outgoing Telegram side.
    #[must_use]
    pub fn messenger(&self) -> &Arc<dyn Messenger> {
        &self.messenger
    }

    pub(crate) fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    /// Handles one update.
    #[instrument(skip(self, update), fields(update_id = update.update_id))]
    pub async fn handle_update(&self, update: Update) -> Result<(), BotError> {
        if let Some(callback) = update.callback_query {
            return self.handle_callback(callback).await;
        }

        let Some(message) = update.message else {
            debug!("Ignoring update without message or callback");
            return Ok(());
        };
        let origin = Origin {
            user: UserId(message.from.as_ref().map_or(message.chat.id, |u| u.id)),
            chat: message.chat.id,
        };

        if let Some(command) = message.command() {
            return self.handle_command(origin, command).await;
        }
        match message {
            Message {
                text: Some(text), ..
            } => self.handle_text(origin, &text).await,
            _ => Ok(()),
        }
    }

    async fn handle_command(&self, origin: Origin, command: &str) -> Result<(), BotError> {
        info!(user_id = %origin.user, command, "Command received");
        match command {
            "start" => self.start(origin).await,
            "add" => self.pick_category(origin, None).await,
            "report" => self.report_menu(origin).await,
            "categories" => self.show_categories(origin).await,
            "transactions" => self.show_transactions(origin).await,
            "summary" => self.send_monthly_summary(origin).await,
            other => {
                debug!(command = other, "Ignoring unknown command");
                Ok(())
            }
        }
    }

    async fn handle_callback(&self, callback: CallbackQuery) -> Result<(), BotError> {
        let origin = Origin {
            user: UserId(callback.from.id),
            chat: callback
                .message
                .as_ref()
                .map_or(callback.from.id, |m| m.chat.id),
        };

        let result = match callback.data.as_deref().map(str::parse::<Callback>) {
            Some(Ok(action)) => {
                debug!(user_id = %origin.user, callback = %action, "Callback received");
                self.dispatch(origin, action).await
            }
            Some(Err(error)) => {
                warn!(user_id = %origin.user, %error, "Ignoring callback");
                Ok(())
            }
            None => Ok(()),
        };

        if let Err(error) = self.messenger.answer_callback(&callback.id).await {
            warn!(%error, "Failed to answer callback query");
        }
        result
    }

    async fn dispatch(&self, origin: Origin, action: Callback) -> Result<(), BotError> {
        match action {
            Callback::AddTransaction(kind) => self.pick_category(origin, Some(kind)).await,
            Callback::ReportMenu => self.report_menu(origin).await,
            Callback::Categories => self.show_categories(origin).await,
            Callback::Transactions => self.show_transactions(origin).await,
            Callback::Back => {
                self.clear_state(origin).await?;
                self.main_menu(origin, render::MAIN_MENU).await
            }
            Callback::NewCategory(kind) => self.ask_category_name(origin, kind).await,
            Callback::SelectCategory(id) => self.select_category(origin, id).await,
            Callback::DeleteCategory(id) => {
                if let Err(error) = self.ledger.delete_category(origin.user, id).await {
                    return self
                        .fail(origin, &failure_text("Could not delete the category", &error))
                        .await;
                }
                self.show_categories(origin).await
            }
            Callback::DeleteTransaction(id) => {
                if let Err(error) = self.ledger.delete_transaction(origin.user, id).await {
                    return self
                        .fail(origin, &failure_text("Could not delete the transaction", &error))
                        .await;
                }
                self.show_transactions(origin).await
            }
            Callback::Report(kind) => self.send_report(origin, kind).await,
        }
    }

    async fn handle_text(&self, origin: Origin, text: &str) -> Result<(), BotError> {
        let state = self
            .sessions
            .get_user_state(origin.user)
            .await
            .map_err(BotError::Session)?;
        debug!(user_id = %origin.user, state = ?state, "Free text received");

        match state {
            Some(UserState {
                awaiting: Some(PendingAction::NewCategory),
                transaction_kind,
                ..
            }) => {
                let kind = transaction_kind.unwrap_or(CategoryKind::Expense);
                self.create_category(origin, text, kind).await
            }
            Some(UserState {
                selected_category: Some(category_id),
                ..
            }) => self.record_transaction(origin, category_id, text).await,
            _ => self.main_menu(origin, "Choose an action:").await,
        }
    }

    async fn start(&self, origin: Origin) -> Result<(), BotError> {
        if let Err(error) = self
            .ledger
            .create_default_categories(origin.user, self.now())
            .await
        {
            return self
                .fail(origin, &failure_text("Could not create default categories", &error))
                .await;
        }
        self.clear_state(origin).await?;
        self.main_menu(origin, render::WELCOME).await
    }

    async fn main_menu(&self, origin: Origin, text: &str) -> Result<(), BotError> {
        self.send(
            SendMessage::new(origin.chat, text)
                .markdown()
                .keyboard(keyboard::main_menu()),
        )
        .await
    }

    async fn report_menu(&self, origin: Origin) -> Result<(), BotError> {
        self.send(
            SendMessage::new(origin.chat, render::REPORT_MENU)
                .markdown()
                .keyboard(keyboard::report_periods()),
        )
        .await
    }

    async fn pick_category(
        &self,
        origin: Origin,
        kind: Option<CategoryKind>,
    ) -> Result<(), BotError> {
        let categories = match self.ledger.categories(origin.user).await {
            Ok(categories) => categories,
            Err(error) => {
                return self
                    .fail(origin, &failure_text("Could not load categories", &error))
                    .await;
            }
        };

        let Some(kind) = kind else {
            return self
                .send(
                    SendMessage::new(origin.chat, "Choose a category:")
                        .keyboard(keyboard::select_category(&categories)),
                )
                .await;
        };

        let matching: Vec<_> = categories
            .iter()
            .filter(|c| c.kind == kind)
            .cloned()
            .collect();
        let message = if matching.is_empty() {
            SendMessage::new(origin.chat, render::no_categories_prompt(kind))
                .keyboard(keyboard::categories(&categories))
        } else {
            SendMessage::new(origin.chat, render::pick_category_prompt(kind))
                .keyboard(keyboard::select_category(&matching))
        };
        self.send(message.markdown()).await
    }

    async fn select_category(&self, origin: Origin, id: CategoryId) -> Result<(), BotError> {
        let category = match self.ledger.category(origin.user, id).await {
            Ok(category) => category,
            Err(error) => {
                return self
                    .fail(origin, &failure_text("Could not select the category", &error))
                    .await;
            }
        };

        let state = UserState::enter_amount(origin.user, category.id, category.kind, Utc::now());
        self.sessions
            .save_user_state(&state)
            .await
            .map_err(BotError::Session)?;

        self.send(SendMessage::new(origin.chat, render::amount_prompt(&category.name)).markdown())
            .await
    }

    async fn ask_category_name(&self, origin: Origin, kind: CategoryKind) -> Result<(), BotError> {
        let state = UserState::new_category(origin.user, kind, Utc::now());
        self.sessions
            .save_user_state(&state)
            .await
            .map_err(BotError::Session)?;

        self.send(SendMessage::new(origin.chat, render::new_category_prompt(kind)).markdown())
            .await
    }

    async fn create_category(
        &self,
        origin: Origin,
        name: &str,
        kind: CategoryKind,
    ) -> Result<(), BotError> {
        let category = match self
            .ledger
            .create_category(origin.user, name, kind, self.now())
            .await
        {
            Ok(category) => category,
            Err(error) => {
                return self
                    .fail(origin, &failure_text("Could not create the category", &error))
                    .await;
            }
        };
        info!(user_id = %origin.user, category_id = %category.id, "Category created");

        self.clear_state(origin).await?;
        self.send(SendMessage::new(
            origin.chat,
            format!("Category '{}' created! ✅", category.name),
        ))
        .await?;
        self.show_categories(origin).await
    }

    async fn record_transaction(
        &self,
        origin: Origin,
        category_id: CategoryId,
        text: &str,
    ) -> Result<(), BotError> {
        let Some((amount, description)) = parse_amount(text) else {
            return self
                .fail(origin, "Invalid amount. Use a number, e.g. 1000.50")
                .await;
        };

        let category = match self.ledger.category(origin.user, category_id).await {
            Ok(category) => category,
            Err(error @ LedgerError::CategoryNotFound(_)) => {
                self.clear_state(origin).await?;
                return self
                    .fail(origin, &failure_text("Could not save the transaction", &error))
                    .await;
            }
            Err(error) => {
                return self
                    .fail(origin, &failure_text("Could not save the transaction", &error))
                    .await;
            }
        };

        let signed = LedgerService::signed_amount(category.kind, amount);
        if let Err(error) = self
            .ledger
            .add_transaction(origin.user, category.id, signed, description, self.now())
            .await
        {
            return self
                .fail(origin, &failure_text("Could not save the transaction", &error))
                .await;
        }

        self.clear_state(origin).await?;
        self.send(
            SendMessage::new(origin.chat, "Transaction saved! ✅").keyboard(keyboard::main_menu()),
        )
        .await
    }

    async fn show_categories(&self, origin: Origin) -> Result<(), BotError> {
        let categories = match self.ledger.categories(origin.user).await {
            Ok(categories) => categories,
            Err(error) => {
                return self
                    .fail(origin, &failure_text("Could not load categories", &error))
                    .await;
            }
        };

        self.send(
            SendMessage::new(origin.chat, render::categories(&categories))
                .markdown()
                .keyboard(keyboard::categories(&categories)),
        )
        .await
    }

    async fn show_transactions(&self, origin: Origin) -> Result<(), BotError> {
        let loaded = async {
            let transactions = self
                .ledger
                .recent_transactions(origin.user, RECENT_TRANSACTIONS)
                .await?;
            let categories = self.ledger.categories(origin.user).await?;
            Ok::<_, LedgerError>((transactions, categories))
        };
        let (transactions, categories) = match loaded.await {
            Ok(loaded) => loaded,
            Err(error) => {
                return self
                    .fail(origin, &failure_text("Could not load transactions", &error))
                    .await;
            }
        };

        let (text, buttons) = render::transactions(&transactions, &categories);
        let markup = if buttons.is_empty() {
            keyboard::main_menu()
        } else {
            keyboard::transactions(buttons.iter().map(|(id, label)| (*id, label.as_str())))
        };
        self.send(SendMessage::new(origin.chat, text).markdown().keyboard(markup))
            .await
    }

    async fn send_report(&self, origin: Origin, kind: ReportKind) -> Result<(), BotError> {
        match self.reports.get_report(origin.user, kind, self.now()).await {
            Ok(report) => {
                self.send(
                    SendMessage::new(origin.chat, render::report(&report))
                        .markdown()
                        .keyboard(keyboard::after_report()),
                )
                .await
            }
            Err(error) => {
                warn!(user_id = %origin.user, %kind, %error, "Report failed");
                self.fail(origin, "Could not build the report").await
            }
        }
    }

    async fn send_monthly_summary(&self, origin: Origin) -> Result<(), BotError> {
        match self
            .reports
            .get_monthly_report(origin.user, self.now())
            .await
        {
            Ok(report) => {
                self.send(
                    SendMessage::new(origin.chat, render::monthly_summary(&report))
                        .markdown()
                        .keyboard(keyboard::after_report()),
                )
                .await
            }
            Err(error) => {
                warn!(user_id = %origin.user, %error, "Monthly summary failed");
                self.fail(origin, "Could not build the report").await
            }
        }
    }

    async fn clear_state(&self, origin: Origin) -> Result<(), BotError> {
        self.sessions
            .delete_user_state(origin.user)
            .await
            .map_err(BotError::Session)
    }

    async fn fail(&self, origin: Origin, text: &str) -> Result<(), BotError> {
        warn!(user_id = %origin.user, reason = text, "Request failed");
        self.send(SendMessage::new(origin.chat, format!("❌ {text}")))
            .await
    }

    async fn send(&self, message: SendMessage) -> Result<(), BotError> {
        self.messenger.send_message(message).await?;
        Ok(())
    }
}
