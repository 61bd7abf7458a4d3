//! Test builders — ergonomic constructors for `Row`, `Dataset` and `Settings`.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use sqm_core::config::Settings;
use sqm_core::report::ReportSettings;
use sqm_core::{CellValue, Dataset, Row};

// ---------------------------------------------------------------------------
// TicketBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for one ticket-log [`Row`].
///
/// # Example
///
/// ```rust
/// let row = TicketBuilder::new("INC100")
///     .status("open")
///     .age("5")
///     .field("sto", "BDG")
///     .build();
/// ```
pub struct TicketBuilder {
    cells: Vec<(String, CellValue)>,
}

impl TicketBuilder {
    pub fn new(incident: &str) -> Self {
        Self {
            cells: vec![("incident".to_string(), CellValue::text(incident))],
        }
    }

    /// A row with no incident column at all.
    pub fn without_id() -> Self {
        Self { cells: vec![] }
    }

    pub fn status(self, status: &str) -> Self {
        self.field("status", status)
    }

    pub fn age(self, age: &str) -> Self {
        self.field("umur tiket", age)
    }

    pub fn age_number(mut self, age: f64) -> Self {
        self.cells.push(("umur tiket".to_string(), CellValue::Number(age)));
        self
    }

    pub fn field(mut self, column: &str, value: &str) -> Self {
        self.cells.push((column.to_string(), CellValue::text(value)));
        self
    }

    pub fn build(self) -> Row {
        self.cells.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// The header of the SQM sheet, already normalised.
pub const SQM_COLUMNS: &[&str] = &["incident", "status", "umur tiket", "customer type", "sto", "summary"];

/// Wrap rows in a dataset carrying the full SQM header.
pub fn sqm_dataset(rows: Vec<Row>) -> Dataset {
    Dataset::new(SQM_COLUMNS.iter().map(|c| c.to_string()).collect(), rows)
}

/// `(incident, status, age)` triples as an SQM dataset.
pub fn tickets(rows: &[(&str, &str, &str)]) -> Dataset {
    sqm_dataset(
        rows.iter()
            .map(|(id, status, age)| TicketBuilder::new(id).status(status).age(age).build())
            .collect(),
    )
}

/// Settings with every required key filled in and the API bases pointed at
/// `telegram` / `sheets`.
pub fn settings_for(telegram: &str, sheets: &str) -> Settings {
    Settings {
        bot_token: Some("123456:TEST-TOKEN".to_string()),
        spreadsheet_id: Some("sheet-under-test".to_string()),
        my_chat_id: Some("-1001".to_string()),
        admin_chat_id: None,
        telegram_api_base: telegram.to_string(),
        sheets_api_base: sheets.to_string(),
        http_timeout_secs: 5,
        ..Settings::defaults()
    }
}

/// Settings for contexts built with in-process fakes.
pub fn test_settings() -> Settings {
    settings_for("http://127.0.0.1:9", "http://127.0.0.1:9")
}

pub fn report_settings() -> ReportSettings {
    ReportSettings::from_settings(&Settings::defaults()).expect("default report settings")
}
