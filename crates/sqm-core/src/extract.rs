//! Free-text identifier extraction.
//!
//! Finds ticket references such as `inc123` or `INC0042` anywhere in a
//! message. Matches are uppercased, deduplicated and returned sorted.

use crate::error::{BotError, Result};
use regex::Regex;
use std::collections::BTreeSet;

/// A compiled `\b<prefix>\d+\b` matcher (case-insensitive).
#[derive(Debug, Clone)]
pub struct IdPattern {
    prefix: String,
    regex: Regex,
}

impl IdPattern {
    pub fn new(prefix: &str) -> Result<Self> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(BotError::configuration("ID_PREFIX must not be empty"));
        }
        let regex = Regex::new(&format!(r"(?i)\b{}\d+\b", regex::escape(prefix)))
            .map_err(|e| BotError::configuration(format!("invalid ID_PREFIX {prefix:?}: {e}")))?;
        Ok(Self {
            prefix: prefix.to_string(),
            regex,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Every distinct identifier in `text`, uppercased and sorted ascending.
    pub fn extract(&self, text: &str) -> Vec<String> {
        self.regex
            .find_iter(text)
            .map(|m| m.as_str().to_uppercase())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Compile `prefix` and extract in one step.
pub fn extract(text: &str, prefix: &str) -> Result<Vec<String>> {
    Ok(IdPattern::new(prefix)?.extract(text))
}
