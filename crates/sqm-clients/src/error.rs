//! Errors raised by the HTTP adapters.

use sqm_core::BotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure. The request URL is stripped because the Bot API
    /// embeds the token in it.
    #[error("request failed: {0}")]
    Http(reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The service-account credential could not be parsed or used.
    #[error("invalid credentials: {0}")]
    Credentials(String),

    #[error("failed to sign token request: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("unexpected response: {0}")]
    Payload(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err.without_url())
    }
}

impl From<ClientError> for BotError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Credentials(_) => BotError::Configuration(err.to_string()),
            other => BotError::Source(other.to_string()),
        }
    }
}

/// Read a non-success response into [`ClientError::Status`].
pub(crate) async fn status_error(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ClientError::Status { status, body }
}
