//! Application configuration management.

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::AppError;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (webhook mode).
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage backend configuration.
    pub supabase: SupabaseConfig,
    /// Telegram transport configuration.
    pub telegram: TelegramConfig,
    /// Report configuration.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// PostgREST (Supabase) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Service or anon API key.
    pub key: String,
}

/// How updates reach the bot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Long polling via `getUpdates`.
    #[default]
    Polling,
    /// Telegram pushes updates to an HTTP endpoint.
    Webhook,
}

/// Telegram configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather.
    pub token: String,
    /// Transport mode.
    #[serde(default)]
    pub mode: TransportMode,
    /// Path the webhook is served on.
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
    /// Long-polling timeout in seconds.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

fn default_webhook_path() -> String {
    "/webhook".to_string()
}

fn default_poll_timeout() -> u64 {
    60
}

/// Report configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// IANA time zone used for report windows and day bucketing.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Local hour (0-23) at which the daily digest is sent. Disabled when unset.
    #[serde(default)]
    pub daily_digest_hour: Option<u32>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            daily_digest_hour: None,
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl ReportConfig {
    /// Parses the configured time zone.
    pub fn tz(&self) -> Result<Tz, AppError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| AppError::Configuration(format!("invalid timezone {}: {e}", self.timezone)))
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// `SUPABASE_URL`, `SUPABASE_KEY` and `TELEGRAM_TOKEN` are honoured on top of
    /// the `FINBOT__SECTION__KEY` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails validation.
    pub fn load() -> Result<Self, AppError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("FINBOT")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("supabase.url", std::env::var("SUPABASE_URL").ok())?
            .set_override_option("supabase.key", std::env::var("SUPABASE_KEY").ok())?
            .set_override_option("telegram.token", std::env::var("TELEGRAM_TOKEN").ok())?
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values the deserializer cannot.
    pub fn validate(&self) -> Result<(), AppError> {
        self.report.tz()?;
        if let Some(hour) = self.report.daily_digest_hour {
            if hour > 23 {
                return Err(AppError::Configuration(format!(
                    "daily_digest_hour must be 0-23, got {hour}"
                )));
            }
        }
        if !self.telegram.webhook_path.starts_with('/') {
            return Err(AppError::Configuration(
                "webhook_path must start with '/'".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_VARS: [(&str, Option<&str>); 3] = [
        ("SUPABASE_URL", Some("https://example.supabase.co")),
        ("SUPABASE_KEY", Some("service-key")),
        ("TELEGRAM_TOKEN", Some("123:abc")),
    ];

    #[test]
    fn test_load_from_plain_variables() {
        temp_env::with_vars(BASE_VARS, || {
            let config = AppConfig::load().unwrap();
            assert_eq!(config.supabase.url, "https://example.supabase.co");
            assert_eq!(config.supabase.key, "service-key");
            assert_eq!(config.telegram.token, "123:abc");
            assert_eq!(config.telegram.mode, TransportMode::Polling);
            assert_eq!(config.telegram.webhook_path, "/webhook");
            assert_eq!(config.telegram.poll_timeout_secs, 60);
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.report.tz().unwrap(), chrono_tz::UTC);
            assert!(config.report.daily_digest_hour.is_none());
        });
    }

    #[test]
    fn test_prefixed_variables_override_defaults() {
        let mut vars = BASE_VARS.to_vec();
        vars.extend([
            ("FINBOT__TELEGRAM__MODE", Some("webhook")),
            ("FINBOT__SERVER__PORT", Some("9000")),
            ("FINBOT__REPORT__TIMEZONE", Some("Europe/Moscow")),
            ("FINBOT__REPORT__DAILY_DIGEST_HOUR", Some("21")),
        ]);
        temp_env::with_vars(vars, || {
            let config = AppConfig::load().unwrap();
            assert_eq!(config.telegram.mode, TransportMode::Webhook);
            assert_eq!(config.server.port, 9000);
            assert_eq!(config.report.tz().unwrap(), chrono_tz::Europe::Moscow);
            assert_eq!(config.report.daily_digest_hour, Some(21));
        });
    }

    #[test]
    fn test_invalid_timezone_is_rejected() {
        let mut vars = BASE_VARS.to_vec();
        vars.push(("FINBOT__REPORT__TIMEZONE", Some("Mars/Olympus")));
        temp_env::with_vars(vars, || {
            let err = AppConfig::load().unwrap_err();
            assert!(matches!(err, AppError::Configuration(_)));
        });
    }

    #[test]
    fn test_missing_token_fails() {
        temp_env::with_vars(
            [
                ("SUPABASE_URL", Some("https://example.supabase.co")),
                ("SUPABASE_KEY", Some("service-key")),
                ("TELEGRAM_TOKEN", None),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_digest_hour_out_of_range() {
        let config = AppConfig {
            server: ServerConfig::default(),
            supabase: SupabaseConfig {
                url: "https://example.supabase.co".into(),
                key: "k".into(),
            },
            telegram: TelegramConfig {
                token: "t".into(),
                mode: TransportMode::Polling,
                webhook_path: default_webhook_path(),
                poll_timeout_secs: 60,
            },
            report: ReportConfig {
                timezone: "UTC".into(),
                daily_digest_hour: Some(24),
            },
        };
        assert!(config.validate().is_err());
    }
}
