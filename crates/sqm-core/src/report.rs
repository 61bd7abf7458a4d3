//! Report and lookup pipelines.
//!
//! Both take an already-fetched [`Dataset`] and return the full reply text;
//! chunking and delivery happen afterwards.

use crate::config::Settings;
use crate::error::{BotError, Result};
use crate::filter::{filter, require_columns, sort_by_numeric, FilterCriterion};
use crate::format::{format_record, format_summary_line, not_found_line, FieldMapping, SummaryField};
use crate::types::{normalize_column, Dataset};
use chrono::{DateTime, TimeZone};

/// Body of a report with no matching tickets.
pub const NO_TICKETS: &str = "Tidak ada tiket yang memenuhi kriteria.";

/// Everything the pipelines need from [`Settings`], resolved once.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub status_column: String,
    pub open_status: String,
    pub age_column: String,
    pub id_column: String,
    pub threshold: f64,
    pub timezone: chrono_tz::Tz,
    pub detail_fields: FieldMapping,
    pub summary_fields: Vec<SummaryField>,
}

impl ReportSettings {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            status_column: normalize_column(&settings.columns.status),
            open_status: settings.columns.open_status.clone(),
            age_column: normalize_column(&settings.columns.age),
            id_column: normalize_column(&settings.columns.incident),
            threshold: settings.threshold_umur,
            timezone: settings.parse_timezone()?,
            detail_fields: settings.detail_mapping(),
            summary_fields: settings.summary_fields(),
        })
    }
}

/// Header line of the scheduled report.
pub fn report_header<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("⏰ Laporan Tiket — {}", now.format("%d/%m/%Y %H:%M"))
}

/// Open tickets younger than the threshold, youngest first.
pub fn select_open_tickets(dataset: &Dataset, settings: &ReportSettings) -> Result<Dataset> {
    require_columns(
        dataset,
        [
            settings.status_column.as_str(),
            settings.age_column.as_str(),
            settings.id_column.as_str(),
        ],
    )?;
    let open = filter(
        dataset,
        &[
            FilterCriterion::equals(&settings.status_column, settings.open_status.clone()),
            FilterCriterion::less_than(&settings.age_column, settings.threshold),
        ],
    )?;
    sort_by_numeric(&open, &settings.age_column)
}

/// Body of the scheduled report: one summary line per ticket, or
/// [`NO_TICKETS`].
pub fn report_body(dataset: &Dataset, settings: &ReportSettings) -> Result<String> {
    let tickets = select_open_tickets(dataset, settings)?;
    if tickets.is_empty() {
        return Ok(NO_TICKETS.to_string());
    }
    Ok(tickets
        .rows()
        .iter()
        .map(|row| format_summary_line(row, &settings.id_column, &settings.summary_fields))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// The full scheduled report, stamped with `now` in the configured timezone.
pub fn build_report<Tz: TimeZone>(
    dataset: &Dataset,
    settings: &ReportSettings,
    now: DateTime<Tz>,
) -> Result<String> {
    let body = report_body(dataset, settings)?;
    let local = now.with_timezone(&settings.timezone);
    Ok(format!("{}\n\n{}", report_header(&local), body))
}

/// One detail block per requested id; ids without a row become a not-found
/// line. Blocks are separated by a blank line.
pub fn build_lookup_reply(
    dataset: &Dataset,
    ids: &[String],
    settings: &ReportSettings,
) -> Result<String> {
    require_columns(dataset, [settings.id_column.as_str()])?;
    let blocks: Vec<String> = ids
        .iter()
        .map(|id| match lookup(dataset, &settings.id_column, id) {
            Ok(block_row) => format_record(block_row, &settings.id_column, &settings.detail_fields),
            Err(err) => {
                tracing::debug!(error = %err, "lookup miss");
                not_found_line(id)
            }
        })
        .collect();
    Ok(blocks.join("\n\n"))
}

fn lookup<'a>(dataset: &'a Dataset, id_column: &str, id: &str) -> Result<&'a crate::types::Row> {
    let wanted = id.trim().to_uppercase();
    dataset
        .rows()
        .iter()
        .find(|row| row.folded(id_column).as_deref() == Some(wanted.as_str()))
        .ok_or_else(|| BotError::NotFound { id: wanted.clone() })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
