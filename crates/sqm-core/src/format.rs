//! Record formatter — renders rows as Telegram HTML.
//!
//! Every interpolated value goes through [`escape_html`]. Fields that are
//! absent or blank in a row are skipped, never rendered as placeholders.

use crate::types::Row;

/// Placeholder for a row with no primary identifier.
pub const MISSING_ID: &str = "N/A";

/// Ordered `(label, column)` pairs for the detail block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    entries: Vec<(String, String)>,
}

impl FieldMapping {
    pub fn new<L, C>(entries: impl IntoIterator<Item = (L, C)>) -> Self
    where
        L: Into<String>,
        C: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(label, column)| (label.into(), crate::types::normalize_column(column.as_ref())))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A column rendered in the one-line report form, with an optional suffix
/// (e.g. `" Jam"` after the ticket age).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryField {
    pub column: String,
    pub suffix: Option<String>,
}

impl SummaryField {
    pub fn new(column: &str, suffix: Option<String>) -> Self {
        Self {
            column: crate::types::normalize_column(column),
            suffix,
        }
    }
}

/// Escape the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

fn primary_id(row: &Row, id_column: &str) -> String {
    row.value(id_column)
        .map(|v| escape_html(&v.to_string()))
        .unwrap_or_else(|| MISSING_ID.to_string())
}

/// Render one detail block: a header with the ticket id, then one
/// `label: value` line per mapped field the row actually has.
pub fn format_record(row: &Row, id_column: &str, mapping: &FieldMapping) -> String {
    let mut lines = vec![format!("🎫 <b>Tiket <code>{}</code></b>", primary_id(row, id_column))];
    for (label, column) in mapping.iter() {
        if let Some(value) = row.value(column) {
            lines.push(format!(
                "<b>{}:</b> {}",
                escape_html(label),
                escape_html(&value.to_string())
            ));
        }
    }
    lines.join("\n")
}

/// Render the compact report line: `<code>ID</code> | 5 Jam | CONSUMER | STO1`.
pub fn format_summary_line(row: &Row, id_column: &str, fields: &[SummaryField]) -> String {
    let mut parts = vec![format!("<code>{}</code>", primary_id(row, id_column))];
    for field in fields {
        if let Some(value) = row.value(&field.column) {
            let suffix = field.suffix.as_deref().unwrap_or("");
            parts.push(format!("{}{}", escape_html(&value.to_string()), escape_html(suffix)));
        }
    }
    parts.join(" | ")
}

/// Line rendered for an identifier that matched no row.
pub fn not_found_line(id: &str) -> String {
    format!("❌ Tiket <code>{}</code> tidak ditemukan.", escape_html(id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
