//! Transfer codec: JSON/CSV export and tolerant JSON import

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::model::{Lead, LeadPatch};
use crate::time::format_date;

/// Basename for export files; the full name embeds the export date.
pub const EXPORT_BASENAME: &str = "loantrail-leads";

/// Fixed CSV column order.
pub const CSV_COLUMNS: [&str; 11] = [
    "id",
    "name",
    "contact",
    "loanAmount",
    "status",
    "source",
    "tags",
    "notes",
    "nextFollowUp",
    "createdAt",
    "updatedAt",
];

/// Delimiter joining tags inside the single CSV tags column.
pub const TAG_JOIN: &str = ";";

/// `loantrail-leads-<YYYY-MM-DD>.<ext>`
pub fn export_file_name(ext: &str, date: NaiveDate) -> String {
    format!("{EXPORT_BASENAME}-{}.{ext}", format_date(date))
}

/// Serialize the full collection verbatim as a pretty-printed JSON array.
pub fn export_json(leads: &[Lead]) -> Result<String> {
    serde_json::to_string_pretty(leads)
        .map_err(|e| Error::Internal(format!("lead serialization failed: {e}")))
}

/// One row per lead in the fixed column order, RFC 4180 escaping.
pub fn export_csv(leads: &[Lead]) -> String {
    let mut out = String::new();
    out.push_str(&CSV_COLUMNS.join(","));
    out.push('\n');
    for lead in leads {
        let fields = [
            lead.id.clone(),
            lead.name.clone(),
            lead.contact.clone(),
            lead.loan_amount.to_string(),
            lead.status.to_string(),
            lead.source.clone(),
            lead.tags.join(TAG_JOIN),
            lead.notes.clone(),
            lead.next_follow_up.map(format_date).unwrap_or_default(),
            lead.created_at.to_string(),
            lead.updated_at.to_string(),
        ];
        let row: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

// Quote a field when it contains a comma, quote, or newline, doubling
// internal quotes.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Parse an imported document into lead records.
///
/// The document must be a JSON array; anything else aborts with
/// [`Error::ImportFormat`] and zero mutation. Individual records are
/// tolerant: missing fields default, unknown statuses coerce to `New`.
pub fn import_json(input: &str) -> Result<Vec<LeadPatch>> {
    let value: serde_json::Value = serde_json::from_str(input)
        .map_err(|e| Error::ImportFormat(format!("not valid JSON: {e}")))?;
    let serde_json::Value::Array(items) = value else {
        return Err(Error::ImportFormat(
            "expected a JSON array of lead records".to_string(),
        ));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<LeadPatch>(item)
                .map_err(|e| Error::ImportFormat(format!("record {i}: {e}")))
        })
        .collect()
}
