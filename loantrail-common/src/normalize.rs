//! Form-input normalization
//!
//! Turns raw, user-typed field values into a canonical [`Lead`]. Every field
//! degrades gracefully (bad amounts become 0, bad dates become "no date",
//! unknown statuses become `New`) except `name`, which is the one hard
//! validation failure.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::model::{new_lead_id, sanitize_amount, Lead, LeadStatus};
use crate::time;

/// Raw form input, all fields as typed.
#[derive(Debug, Clone, Default)]
pub struct LeadDraft {
    pub name: String,
    pub contact: String,
    pub loan_amount: String,
    pub status: String,
    pub source: String,
    /// Comma-separated tag list.
    pub tags: String,
    pub notes: String,
    pub next_follow_up: String,
}

/// Validate and coerce a draft into a canonical lead with a fresh id and
/// `created_at == updated_at == now`.
///
/// # Errors
///
/// Returns [`Error::Validation`] when `name` is empty after trimming.
pub fn normalize(draft: &LeadDraft) -> Result<Lead> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(Error::Validation("name is required".to_string()));
    }

    let now = time::now_millis();
    Ok(Lead {
        id: new_lead_id(),
        name: name.to_string(),
        contact: draft.contact.trim().to_string(),
        loan_amount: parse_amount(&draft.loan_amount),
        status: LeadStatus::parse_lenient(&draft.status),
        source: draft.source.trim().to_string(),
        tags: parse_tags(&draft.tags),
        notes: draft.notes.trim().to_string(),
        next_follow_up: parse_date(&draft.next_follow_up),
        close_date: None,
        created_at: now,
        updated_at: now,
    })
}

/// Numeric coercion: parse as f64, clamp to finite ≥ 0, default 0 on failure.
pub fn parse_amount(raw: &str) -> f64 {
    sanitize_amount(raw.trim().parse().unwrap_or(0.0))
}

/// Split a comma-separated tag string into trimmed, non-empty tags.
/// Order is preserved and duplicates are kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Parse a `YYYY-MM-DD` date. Datetime strings are accepted by taking their
/// date prefix; anything else yields no date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| raw.get(..10).and_then(|p| NaiveDate::parse_from_str(p, "%Y-%m-%d").ok()))
}
