//! Configuration types for sqm-bot.
//!
//! [`Settings::load`] layers, in order: the embedded defaults below, an
//! optional TOML file, then the process environment (only the keys in
//! [`ENV_KEYS`]). [`Settings::defaults`] returns the embedded defaults without
//! touching the filesystem or the environment (useful in tests).

use crate::error::BotError;
use crate::format::{FieldMapping, SummaryField};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
sheet_name        = "SQM"
timezone          = "Asia/Tokyo"
threshold_umur    = 24
chunk_size        = 3500
id_prefix         = "inc"
bind_addr         = "0.0.0.0:3000"
http_timeout_secs = 30
telegram_api_base = "https://api.telegram.org"
sheets_api_base   = "https://sheets.googleapis.com"

[columns]
status      = "status"
open_status = "OPEN"
age         = "umur tiket"
incident    = "incident"

[[detail_fields]]
label  = "Status"
column = "status"

[[detail_fields]]
label  = "Umur Tiket (Jam)"
column = "umur tiket"

[[detail_fields]]
label  = "Customer Type"
column = "customer type"

[[detail_fields]]
label  = "STO"
column = "sto"

[[detail_fields]]
label  = "Summary"
column = "summary"

[[summary_fields]]
column = "umur tiket"
suffix = " Jam"

[[summary_fields]]
column = "customer type"

[[summary_fields]]
column = "sto"
"#;

/// Telegram's `sendMessage` text limit, in chars. `CHUNK_SIZE` may not exceed it.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Environment variables read by [`Settings::load`]. Anything else in the
/// environment is ignored.
pub const ENV_KEYS: &[&str] = &[
    "BOT_TOKEN",
    "SPREADSHEET_ID",
    "MY_CHAT_ID",
    "ADMIN_CHAT_ID",
    "GOOGLE_CREDENTIALS_JSON",
    "SHEET_NAME",
    "TIMEZONE",
    "THRESHOLD_UMUR",
    "CHUNK_SIZE",
    "ID_PREFIX",
    "BIND_ADDR",
    "HTTP_TIMEOUT_SECS",
    "TELEGRAM_API_BASE",
    "SHEETS_API_BASE",
];

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    /// Destination of the scheduled report.
    #[serde(default)]
    pub my_chat_id: Option<String>,
    /// Fallback recipient for operational error reports.
    #[serde(default)]
    pub admin_chat_id: Option<String>,
    /// Service-account key file contents.
    #[serde(default)]
    pub google_credentials_json: Option<String>,
    pub sheet_name: String,
    pub timezone: String,
    pub threshold_umur: f64,
    pub chunk_size: usize,
    pub id_prefix: String,
    pub bind_addr: String,
    pub http_timeout_secs: u64,
    pub telegram_api_base: String,
    pub sheets_api_base: String,
    pub columns: ColumnsConfig,
    #[serde(default)]
    pub detail_fields: Vec<DetailFieldConfig>,
    #[serde(default)]
    pub summary_fields: Vec<SummaryFieldConfig>,
}

/// `[columns]` section: the normalised column names the pipeline relies on.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnsConfig {
    pub status: String,
    pub open_status: String,
    pub age: String,
    pub incident: String,
}

/// One `[[detail_fields]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailFieldConfig {
    pub label: String,
    pub column: String,
}

/// One `[[summary_fields]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryFieldConfig {
    pub column: String,
    #[serde(default)]
    pub suffix: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Settings {
    /// Load from the embedded defaults, `path` (if given) and the process
    /// environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let env = ENV_KEYS
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
            .collect();
        Self::from_sources(path, env)
    }

    /// Load from the embedded defaults, an optional TOML file and an explicit
    /// environment map.
    pub fn from_sources(path: Option<&Path>, env: HashMap<String, String>) -> anyhow::Result<Self> {
        let env: config::Map<String, String> = env
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .add_source(config::Environment::default().source(Some(env)).ignore_empty(true))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Check the settings every invocation needs. Reports all missing keys at
    /// once.
    pub fn validate(&self) -> Result<(), BotError> {
        let mut missing = Vec::new();
        if blank(&self.bot_token) {
            missing.push("BOT_TOKEN");
        }
        if blank(&self.spreadsheet_id) {
            missing.push("SPREADSHEET_ID");
        }
        if blank(&self.google_credentials_json) {
            missing.push("GOOGLE_CREDENTIALS_JSON");
        }
        if !missing.is_empty() {
            return Err(BotError::configuration(format!(
                "missing required settings: {}",
                missing.join(", ")
            )));
        }
        self.validate_values()
    }

    /// Check the values that have defaults.
    pub fn validate_values(&self) -> Result<(), BotError> {
        if self.chunk_size == 0 {
            return Err(BotError::configuration("CHUNK_SIZE must be greater than zero"));
        }
        if self.chunk_size > MAX_MESSAGE_CHARS {
            return Err(BotError::configuration(format!(
                "CHUNK_SIZE must be at most {MAX_MESSAGE_CHARS}"
            )));
        }
        if self.http_timeout_secs == 0 {
            return Err(BotError::configuration("HTTP_TIMEOUT_SECS must be greater than zero"));
        }
        if !self.threshold_umur.is_finite() {
            return Err(BotError::configuration("THRESHOLD_UMUR must be a finite number"));
        }
        self.parse_timezone()?;
        Ok(())
    }

    /// Parse the configured timezone into a `chrono_tz::Tz`.
    pub fn parse_timezone(&self) -> Result<chrono_tz::Tz, BotError> {
        self.timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|_| BotError::configuration(format!("invalid TIMEZONE: {}", self.timezone)))
    }

    /// Destination of the scheduled report.
    pub fn report_chat_id(&self) -> Result<&str, BotError> {
        non_blank(&self.my_chat_id).ok_or_else(|| BotError::configuration("MY_CHAT_ID is not set"))
    }

    pub fn admin_chat_id(&self) -> Option<&str> {
        non_blank(&self.admin_chat_id)
    }

    pub fn bot_token(&self) -> Option<&str> {
        non_blank(&self.bot_token)
    }

    pub fn spreadsheet_id(&self) -> Option<&str> {
        non_blank(&self.spreadsheet_id)
    }

    pub fn google_credentials_json(&self) -> Option<&str> {
        non_blank(&self.google_credentials_json)
    }

    pub fn detail_mapping(&self) -> FieldMapping {
        FieldMapping::new(
            self.detail_fields
                .iter()
                .map(|f| (f.label.clone(), f.column.clone())),
        )
    }

    pub fn summary_fields(&self) -> Vec<SummaryField> {
        self.summary_fields
            .iter()
            .map(|f| SummaryField::new(&f.column, f.suffix.clone()))
            .collect()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn blank(value: &Option<String>) -> bool {
    non_blank(value).is_none()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
