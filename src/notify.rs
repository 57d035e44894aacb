//! Notification delivery
//!
//! The poller hands each rendered message to a [`Notifier`] exactly once and
//! only logs the outcome; delivery is never retried.

use crate::error::NotifyError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::info;

/// Default Telegram Bot API endpoint.
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` to `destination` (a chat id for the Telegram notifier).
    async fn send(&self, destination: &str, text: &str) -> Result<(), NotifyError>;
}

/// Sends plain-text messages through a Telegram bot.
pub struct TelegramNotifier {
    client: reqwest::Client,
    /// `<api>/bot<token>`; never logged, and stripped from request errors.
    bot_url: String,
}

#[derive(Debug, Deserialize)]
struct BotResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(token: &str, timeout: Duration) -> Result<Self, NotifyError> {
        Self::with_api_url(TELEGRAM_API_URL, token, timeout)
    }

    /// Use a different Bot API server (e.g. a self-hosted one).
    pub fn with_api_url(api_url: &str, token: &str, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            bot_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(format!("{}/sendMessage", self.bot_url))
            .json(&json!({
                "chat_id": destination,
                "text": text,
            }))
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        let body: BotResponse = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)?;
        if !status.is_success() || !body.ok {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                description: body.description.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

/// Dry-run notifier that writes messages to the log instead of a chat.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        info!(destination, "Notification (dry run):\n{}", text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_response_parsing() {
        let ok: BotResponse = serde_json::from_str(r#"{"ok":true,"result":{}}"#).unwrap();
        assert!(ok.ok);
        assert!(ok.description.is_none());

        let rejected: BotResponse =
            serde_json::from_str(r#"{"ok":false,"error_code":400,"description":"chat not found"}"#)
                .unwrap();
        assert!(!rejected.ok);
        assert_eq!(rejected.description.as_deref(), Some("chat not found"));
    }

    #[test]
    fn test_bot_url() {
        let notifier =
            TelegramNotifier::with_api_url("http://localhost:8081/", "123:abc", Duration::from_secs(1))
                .unwrap();
        assert_eq!(notifier.bot_url, "http://localhost:8081/bot123:abc");
    }

    #[tokio::test]
    async fn test_request_error_hides_token() {
        // nothing listens on port 1
        let notifier = TelegramNotifier::with_api_url(
            "http://127.0.0.1:1",
            "123:SECRETTOKEN",
            Duration::from_secs(2),
        )
        .unwrap();

        let err = notifier.send("-100", "hello").await.unwrap_err();
        assert!(matches!(err, NotifyError::Http(_)));
        let text = err.to_string();
        assert!(!text.contains("SECRETTOKEN"), "token leaked: {}", text);
    }

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        assert!(LogNotifier.send("-100", "hello").await.is_ok());
    }
}
