//! Tabular data source seam.

use crate::error::Result;
use crate::types::Dataset;
use async_trait::async_trait;

/// Read-only access to a named table. Implementations return header names
/// as they appear in the sheet; [`Dataset::from_records`] normalises them.
#[async_trait]
pub trait TableSource: Send + Sync {
    async fn fetch_table(&self, name: &str) -> Result<Dataset>;
}
