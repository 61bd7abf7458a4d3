//! Error taxonomy for a single bot invocation.
//!
//! Every fallible pipeline step returns [`BotError`]. Delivery failures are
//! kept apart in [`DeliveryError`] because they are never escalated: the
//! notifier collects them instead of returning them.

use thiserror::Error;

/// Errors that end (or, for `NotFound`, annotate) one invocation.
#[derive(Debug, Error)]
pub enum BotError {
    /// Missing or invalid credentials or settings.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An expected column is absent from the fetched dataset.
    #[error("Column '{column}' not found in spreadsheet.")]
    Schema { column: String },

    /// A requested identifier has no matching row.
    #[error("{id} not found")]
    NotFound { id: String },

    /// The table source failed (transport, auth or payload).
    #[error("data source error: {0}")]
    Source(String),
}

impl BotError {
    pub fn schema(column: impl Into<String>) -> Self {
        BotError::Schema {
            column: column.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        BotError::Configuration(message.into())
    }

    /// Message shown to the chat that triggered the invocation, if any.
    pub fn user_notice(&self, context: &str) -> Option<String> {
        match self {
            BotError::Schema { .. } => Some(format!("Error: {self}")),
            BotError::Source(_) => Some(format!("Bot Error during {context}: {self}")),
            BotError::Configuration(_) | BotError::NotFound { .. } => None,
        }
    }
}

/// The send-message capability failed for one message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("delivery to {destination} failed: {reason}")]
pub struct DeliveryError {
    pub destination: String,
    pub reason: String,
}

impl DeliveryError {
    pub fn new(destination: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = BotError> = std::result::Result<T, E>;
