use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::briefing::Notify;
use crate::error::DeliveryError;

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends HTML-formatted messages to a single Telegram chat through the Bot API
pub struct TelegramNotifier {
    client: Client,
    token: String,
    chat_id: String,
    base_url: String,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            token,
            chat_id,
            base_url: TELEGRAM_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn send_message(&self, message: &str) -> Result<(), DeliveryError> {
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text: message,
            parse_mode: "HTML",
        };

        // The bot token is part of the path; never let it reach an error message
        let url = format!(
            "{}/bot{}/sendMessage",
            self.base_url.trim_end_matches('/'),
            self.token
        );

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DeliveryError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DeliveryError::Http(e.without_url()))?;

        let parsed = serde_json::from_str::<TelegramResponse>(&body).ok();

        match parsed {
            Some(TelegramResponse { ok: true, .. }) if status.is_success() => Ok(()),
            Some(TelegramResponse {
                description: Some(description),
                ..
            }) => Err(DeliveryError::Rejected(description)),
            Some(_) if status.is_success() => {
                Err(DeliveryError::Rejected("no description given".to_string()))
            }
            _ => Err(DeliveryError::Status { status, body }),
        }
    }
}

#[async_trait::async_trait]
impl Notify for TelegramNotifier {
    async fn notify(&self, message: &str) -> Result<(), DeliveryError> {
        match self.send_message(message).await {
            Ok(()) => {
                info!("Briefing message sent to Telegram");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to send Telegram message");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn notifier(server: &mockito::ServerGuard) -> TelegramNotifier {
        TelegramNotifier::new("123:secret".to_string(), "42".to_string())
            .unwrap()
            .with_base_url(server.url())
    }

    #[tokio::test]
    async fn test_sends_html_message_to_chat() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:secret/sendMessage")
            .match_body(Matcher::Json(json!({
                "chat_id": "42",
                "text": "<b>Hello</b>",
                "parse_mode": "HTML"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": {"message_id": 7}}"#)
            .create_async()
            .await;

        notifier(&server).notify("<b>Hello</b>").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejection_carries_description() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:secret/sendMessage")
            .with_status(400)
            .with_body(
                r#"{"ok": false, "error_code": 400, "description": "Bad Request: can't parse entities"}"#,
            )
            .create_async()
            .await;

        let err = notifier(&server).notify("<b>broken").await.unwrap_err();
        match err {
            DeliveryError::Rejected(description) => {
                assert_eq!(description, "Bad Request: can't parse entities")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_reports_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:secret/sendMessage")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let err = notifier(&server).notify("hi").await.unwrap_err();
        assert!(matches!(err, DeliveryError::Status { status, .. } if status == 502));
        assert!(!err.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_ok_false_without_description_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:secret/sendMessage")
            .with_status(200)
            .with_body(r#"{"ok": false}"#)
            .create_async()
            .await;

        let err = notifier(&server).notify("hi").await.unwrap_err();
        assert!(matches!(err, DeliveryError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_hides_token() {
        let notifier = TelegramNotifier::new("123:secret".to_string(), "42".to_string())
            .unwrap()
            .with_base_url("http://127.0.0.1:1");

        let err = notifier.notify("hi").await.unwrap_err();
        assert!(matches!(err, DeliveryError::Http(_)));
        assert!(!err.to_string().contains("secret"));
    }
}
