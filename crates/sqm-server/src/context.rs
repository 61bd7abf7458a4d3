//! Process-wide invocation context.
//!
//! Built once at startup and shared read-only by every request. Each handle
//! is initialised exactly once; a failed initialisation is recorded as
//! [`Availability::Unavailable`] and every later use fails fast with
//! [`BotError::Configuration`] instead of retrying.

use sqm_clients::{SheetsClient, TelegramClient};
use sqm_core::config::Settings;
use sqm_core::extract::IdPattern;
use sqm_core::report::ReportSettings;
use sqm_core::{BotError, MessageSender, TableSource};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// A handle that either initialised or recorded why it could not.
#[derive(Debug, Clone)]
pub enum Availability<T> {
    Ready(T),
    Unavailable(String),
}

impl<T> Availability<T> {
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Availability::Ready(value),
            Err(err) => Availability::Unavailable(err.to_string()),
        }
    }

    pub fn get(&self) -> Result<&T, BotError> {
        match self {
            Availability::Ready(value) => Ok(value),
            Availability::Unavailable(reason) => Err(BotError::Configuration(reason.clone())),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Availability::Ready(_))
    }
}

/// Settings resolved into the shapes the pipeline stages take.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub report: ReportSettings,
    pub ids: IdPattern,
    pub chunk_size: usize,
}

impl Pipeline {
    pub fn new(settings: &Settings) -> Result<Self, BotError> {
        settings.validate_values()?;
        Ok(Self {
            report: ReportSettings::from_settings(settings)?,
            ids: IdPattern::new(&settings.id_prefix)?,
            chunk_size: settings.chunk_size,
        })
    }
}

pub struct BotContext {
    pub settings: Settings,
    pipeline: Availability<Pipeline>,
    source: Availability<Arc<dyn TableSource>>,
    sender: Availability<Arc<dyn MessageSender>>,
}

impl BotContext {
    /// Build the real clients from `settings`. Never fails: anything missing
    /// or invalid is recorded as unavailable and logged once here.
    pub fn initialize(settings: Settings) -> Self {
        let timeout = Duration::from_secs(settings.http_timeout_secs);

        let sender = match settings.bot_token() {
            Some(token) => Availability::from_result(
                TelegramClient::new(token, settings.telegram_api_base.as_str(), timeout)
                    .map(|c| Arc::new(c) as Arc<dyn MessageSender>),
            ),
            None => Availability::Unavailable("BOT_TOKEN is not set".to_string()),
        };

        let source = match (settings.google_credentials_json(), settings.spreadsheet_id()) {
            (Some(json), Some(id)) => Availability::from_result(
                SheetsClient::from_credentials_json(json, id, &settings.sheets_api_base, timeout)
                    .map(|c| {
                        info!(account = %c.service_account_email(), "Google Sheets client authorised");
                        Arc::new(c) as Arc<dyn TableSource>
                    }),
            ),
            (None, _) => Availability::Unavailable("GOOGLE_CREDENTIALS_JSON is not set".to_string()),
            (_, None) => Availability::Unavailable("SPREADSHEET_ID is not set".to_string()),
        };

        Self::assemble(settings, source, sender)
    }

    /// Build a context around caller-supplied handles.
    pub fn with_handles(
        settings: Settings,
        source: Arc<dyn TableSource>,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        Self::assemble(settings, Availability::Ready(source), Availability::Ready(sender))
    }

    fn assemble(
        settings: Settings,
        source: Availability<Arc<dyn TableSource>>,
        sender: Availability<Arc<dyn MessageSender>>,
    ) -> Self {
        let pipeline = Availability::from_result(Pipeline::new(&settings).map_err(|err| match err {
            BotError::Configuration(reason) => reason,
            other => other.to_string(),
        }));
        for (name, reason) in [
            ("pipeline", unavailable_reason(&pipeline)),
            ("data source", unavailable_reason(&source)),
            ("sender", unavailable_reason(&sender)),
        ] {
            if let Some(reason) = reason {
                warn!(handle = name, reason, "handle unavailable; dependent operations will fail");
            }
        }
        Self {
            settings,
            pipeline,
            source,
            sender,
        }
    }

    pub fn pipeline(&self) -> Result<&Pipeline, BotError> {
        self.pipeline.get()
    }

    pub fn source(&self) -> Result<&Arc<dyn TableSource>, BotError> {
        self.source.get()
    }

    pub fn sender(&self) -> Result<&Arc<dyn MessageSender>, BotError> {
        self.sender.get()
    }
}

fn unavailable_reason<T>(handle: &Availability<T>) -> Option<&str> {
    match handle {
        Availability::Ready(_) => None,
        Availability::Unavailable(reason) => Some(reason.as_str()),
    }
}
