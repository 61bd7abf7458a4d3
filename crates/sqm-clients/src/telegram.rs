//! Telegram Bot API adapter (`sendMessage` only).

use crate::error::{status_error, ClientError};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sqm_core::{DeliveryError, MessageSender, ParseMode};
use std::time::Duration;
use tracing::debug;

/// Sends messages through `POST {base}/bot{token}/sendMessage`.
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    token: SecretString,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramClient {
    pub fn new(
        token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ClientError::Credentials("bot token is empty".to_string()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: SecretString::from(token),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token.expose_secret(), method)
    }

    async fn send_message(&self, chat_id: &str, text: &str, mode: ParseMode) -> Result<(), ClientError> {
        let request = SendMessage {
            chat_id,
            text,
            parse_mode: mode.as_api_str(),
            disable_web_page_preview: true,
        };

        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: ApiResponse = response.json().await?;
        if !body.ok {
            return Err(ClientError::Payload(
                body.description.unwrap_or_else(|| "ok=false".to_string()),
            ));
        }
        debug!(chat_id, chars = text.chars().count(), "message sent");
        Ok(())
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    async fn send_text(
        &self,
        destination: &str,
        text: &str,
        mode: ParseMode,
    ) -> Result<(), DeliveryError> {
        self.send_message(destination, text, mode)
            .await
            .map_err(|e| DeliveryError::new(destination, e.to_string()))
    }
}
