//! sqm-core — ticket pipeline for sqm-bot.
//!
//! This crate holds everything that does not talk to the network: the
//! tabular data model, the error taxonomy, configuration, and the pipeline
//! stages, plus the two seams ([`TableSource`], [`MessageSender`]) the
//! adapters in `sqm-clients` implement.
//!
//! # Pipeline
//!
//! ```text
//! TableSource ──► filter / extract ──► format ──► chunk ──► notify ──► MessageSender
//! ```

pub mod chunk;
pub mod config;
pub mod error;
pub mod extract;
pub mod filter;
pub mod format;
pub mod notify;
pub mod report;
pub mod source;
pub mod types;

pub use error::{BotError, DeliveryError};
pub use notify::{DeliveryReport, MessageSender, ParseMode};
pub use source::TableSource;
pub use types::{CellValue, Dataset, Row};
