//! Notifier — dispatches chunks through a [`MessageSender`].
//!
//! Delivery is best-effort: each chunk is attempted exactly once, a failed
//! chunk does not stop later ones, and failures come back in the
//! [`DeliveryReport`] rather than as an error.

use crate::error::DeliveryError;
use async_trait::async_trait;

/// Markup mode understood by the send capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    Html,
    Plain,
}

impl ParseMode {
    /// Wire value for the Bot API `parse_mode` field.
    pub fn as_api_str(self) -> Option<&'static str> {
        match self {
            ParseMode::Html => Some("HTML"),
            ParseMode::Plain => None,
        }
    }
}

/// The external "send text to destination" capability.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text(
        &self,
        destination: &str,
        text: &str,
        mode: ParseMode,
    ) -> Result<(), DeliveryError>;
}

/// Outcome of one [`notify`] call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    /// `(chunk index, error)` for each chunk that failed.
    pub failures: Vec<(usize, DeliveryError)>,
}

impl DeliveryReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Send every non-blank chunk to `destination`, in order.
pub async fn notify(
    sender: &dyn MessageSender,
    destination: &str,
    chunks: &[String],
) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    for (index, chunk) in chunks.iter().enumerate() {
        if chunk.trim().is_empty() {
            tracing::debug!(index, "skipping blank chunk");
            continue;
        }
        match sender.send_text(destination, chunk, ParseMode::Html).await {
            Ok(()) => report.sent += 1,
            Err(error) => {
                tracing::warn!(destination, index, error = %error, "chunk delivery failed");
                report.failures.push((index, error));
            }
        }
    }
    report
}
