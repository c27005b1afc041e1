//! Finbot
//!
//! Main entry point: wires storage, the Telegram client and the chosen
//! transport together.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finbot_bot::digest::run_daily_digest;
use finbot_bot::telegram::TelegramClient;
use finbot_bot::{AppState, BotHandler, Poller, create_router};
use finbot_db::connect;
use finbot_shared::AppConfig;
use finbot_shared::config::TransportMode;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finbot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    let tz = config.report.tz()?;

    // Storage doubles as the session store
    let repo = Arc::new(connect(&config.supabase)?);
    info!(url = %config.supabase.url, "Storage client configured");

    let messenger = Arc::new(TelegramClient::new(&config.telegram.token)?);
    let handler = Arc::new(BotHandler::new(repo.clone(), repo, messenger, tz));

    if let Some(hour) = config.report.daily_digest_hour {
        info!(hour, timezone = %tz, "Daily digest enabled");
        tokio::spawn(run_daily_digest(handler.clone(), hour));
    }

    match config.telegram.mode {
        TransportMode::Polling => {
            let poller = Poller::new(handler, config.telegram.poll_timeout_secs);
            tokio::select! {
                () = poller.run() => {}
                _ = tokio::signal::ctrl_c() => info!("Shutting down"),
            }
        }
        TransportMode::Webhook => {
            let app = create_router(AppState { handler }, &config.telegram.webhook_path);

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = TcpListener::bind(&addr).await?;
            info!(path = %config.telegram.webhook_path, "Webhook server listening on {}", addr);

            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    tokio::signal::ctrl_c().await.ok();
                    info!("Shutting down");
                })
                .await?;
        }
    }

    Ok(())
}
