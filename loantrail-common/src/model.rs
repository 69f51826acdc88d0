//! Lead domain model

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::serde_lenient;

/// Pipeline status for a lead.
///
/// The ordered pipeline runs `New → Pre-Approved → In Process → Conditional →
/// Clear to Close → Won`. `Lost` is a side-terminal state; for single-step
/// status moves it sits after `Won` so movement clamps there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LeadStatus {
    #[default]
    New,
    #[serde(rename = "Pre-Approved")]
    PreApproved,
    #[serde(rename = "In Process")]
    InProcess,
    Conditional,
    #[serde(rename = "Clear to Close")]
    ClearToClose,
    Won,
    Lost,
}

/// Full status ordering used for single-step moves (clamped at both ends).
pub const STATUS_ORDER: [LeadStatus; 7] = [
    LeadStatus::New,
    LeadStatus::PreApproved,
    LeadStatus::InProcess,
    LeadStatus::Conditional,
    LeadStatus::ClearToClose,
    LeadStatus::Won,
    LeadStatus::Lost,
];

impl LeadStatus {
    /// Display label, also the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::PreApproved => "Pre-Approved",
            LeadStatus::InProcess => "In Process",
            LeadStatus::Conditional => "Conditional",
            LeadStatus::ClearToClose => "Clear to Close",
            LeadStatus::Won => "Won",
            LeadStatus::Lost => "Lost",
        }
    }

    /// Parse a status label (case-insensitive). Returns `None` when the label
    /// is not a pipeline member.
    pub fn from_label(label: &str) -> Option<LeadStatus> {
        let label = label.trim();
        STATUS_ORDER
            .iter()
            .copied()
            .find(|s| s.as_str().eq_ignore_ascii_case(label))
    }

    /// Parse a status label, coercing anything unrecognized to `New`.
    pub fn parse_lenient(label: &str) -> LeadStatus {
        Self::from_label(label).unwrap_or_default()
    }

    /// True for the terminal states `Won` and `Lost`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LeadStatus::Won | LeadStatus::Lost)
    }

    fn position(&self) -> usize {
        STATUS_ORDER.iter().position(|s| s == self).unwrap_or(0)
    }

    /// One step forward along the status ordering, clamped at `Lost`.
    pub fn next(&self) -> LeadStatus {
        let i = self.position();
        STATUS_ORDER[(i + 1).min(STATUS_ORDER.len() - 1)]
    }

    /// One step backward along the status ordering, clamped at `New`.
    pub fn prev(&self) -> LeadStatus {
        let i = self.position();
        STATUS_ORDER[i.saturating_sub(1)]
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Unrecognized labels coerce to New rather than failing the record.
impl<'de> Deserialize<'de> for LeadStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(LeadStatus::parse_lenient(&label))
    }
}

/// A sales lead, the sole entity of the system.
///
/// Serialized field names follow the durable-storage schema (camelCase).
/// Deserialization is tolerant: missing fields default, unrecognized status
/// coerces to `New`, numeric ids are stringified, and string amounts are
/// parsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lead {
    #[serde(deserialize_with = "serde_lenient::id_string")]
    pub id: String,
    pub name: String,
    /// Free-text phone and/or email.
    pub contact: String,
    #[serde(deserialize_with = "serde_lenient::amount")]
    pub loan_amount: f64,
    pub status: LeadStatus,
    pub source: String,
    #[serde(deserialize_with = "serde_lenient::tags")]
    pub tags: Vec<String>,
    pub notes: String,
    #[serde(deserialize_with = "serde_lenient::opt_date")]
    pub next_follow_up: Option<NaiveDate>,
    #[serde(deserialize_with = "serde_lenient::opt_date")]
    pub close_date: Option<NaiveDate>,
    /// Epoch milliseconds, set at creation.
    #[serde(deserialize_with = "serde_lenient::millis")]
    pub created_at: i64,
    /// Epoch milliseconds, refreshed on every mutation.
    #[serde(deserialize_with = "serde_lenient::millis")]
    pub updated_at: i64,
}

impl Lead {
    /// Shallow per-field merge: fields present in the patch overwrite, absent
    /// fields are preserved. `id` and `created_at` are immutable and never
    /// touched; `updated_at` is the store's responsibility.
    pub fn apply_patch(&mut self, patch: &LeadPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(contact) = &patch.contact {
            self.contact = contact.clone();
        }
        if let Some(amount) = patch.loan_amount {
            self.loan_amount = sanitize_amount(amount);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(source) = &patch.source {
            self.source = source.clone();
        }
        if let Some(tags) = &patch.tags {
            self.tags = tags.clone();
        }
        if let Some(notes) = &patch.notes {
            self.notes = notes.clone();
        }
        if let Some(next_follow_up) = patch.next_follow_up {
            self.next_follow_up = next_follow_up;
        }
        if let Some(close_date) = patch.close_date {
            self.close_date = close_date;
        }
    }

    /// Build a new lead from an import record, generating an id and stamping
    /// timestamps where the record does not supply valid ones.
    pub fn from_patch(patch: LeadPatch, now: i64) -> Lead {
        let id = patch
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(new_lead_id);
        let created_at = patch.created_at.filter(|ts| *ts > 0).unwrap_or(now);
        Lead {
            id,
            name: patch.name.unwrap_or_default(),
            contact: patch.contact.unwrap_or_default(),
            loan_amount: sanitize_amount(patch.loan_amount.unwrap_or(0.0)),
            status: patch.status.unwrap_or_default(),
            source: patch.source.unwrap_or_default(),
            tags: patch.tags.unwrap_or_default(),
            notes: patch.notes.unwrap_or_default(),
            next_follow_up: patch.next_follow_up.flatten(),
            close_date: patch.close_date.flatten(),
            created_at,
            updated_at: now.max(created_at),
        }
    }
}

/// Partial lead record: the explicit per-field merge contract used by both
/// `update` and import merging. A `None` field means "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadPatch {
    #[serde(deserialize_with = "serde_lenient::opt_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub contact: Option<String>,
    #[serde(deserialize_with = "serde_lenient::opt_amount")]
    pub loan_amount: Option<f64>,
    pub status: Option<LeadStatus>,
    pub source: Option<String>,
    #[serde(deserialize_with = "serde_lenient::opt_tags")]
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    /// `Some(Some(d))` = set, `Some(None)` = clear, `None` = no change.
    #[serde(deserialize_with = "serde_lenient::opt_opt_date")]
    pub next_follow_up: Option<Option<NaiveDate>>,
    /// Same convention as `next_follow_up`.
    #[serde(deserialize_with = "serde_lenient::opt_opt_date")]
    pub close_date: Option<Option<NaiveDate>>,
    #[serde(deserialize_with = "serde_lenient::opt_millis")]
    pub created_at: Option<i64>,
    #[serde(deserialize_with = "serde_lenient::opt_millis")]
    pub updated_at: Option<i64>,
}

/// Generate a fresh opaque lead id (UUIDv4 string).
pub fn new_lead_id() -> String {
    Uuid::new_v4().to_string()
}

/// Clamp an amount to a finite, non-negative number.
pub fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() {
        amount.max(0.0)
    } else {
        0.0
    }
}
