//! sqm-clients — network adapters for sqm-bot.
//!
//! Each adapter implements one of the seams defined in `sqm-core`:
//! [`SheetsClient`] is a [`sqm_core::TableSource`] and [`TelegramClient`] is a
//! [`sqm_core::MessageSender`]. Neither retries; transport timeouts come from
//! the underlying `reqwest` client.

pub mod error;
pub mod sheets;
pub mod telegram;

pub use error::ClientError;
pub use sheets::{dataset_from_values, ServiceAccountKey, SheetsClient};
pub use telegram::TelegramClient;
