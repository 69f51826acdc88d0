//! View projections and aggregate metrics
//!
//! Pure functions over a lead slice: the store hands out read-only data and
//! this module derives the filtered/sorted projection the UI renders, plus
//! the pipeline metrics computed over the full collection.

use chrono::NaiveDate;

use crate::model::{Lead, LeadStatus};
use crate::time;

/// Named comparators selectable for the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recently created first.
    #[default]
    Recent,
    /// Amount high → low.
    AmountDesc,
    /// Amount low → high.
    AmountAsc,
    /// Name, case-insensitive.
    Name,
    /// Next follow-up date ascending; leads without one sort last.
    FollowUp,
}

impl SortKey {
    pub fn from_name(name: &str) -> Option<SortKey> {
        match name.trim().to_ascii_lowercase().as_str() {
            "recent" => Some(SortKey::Recent),
            "amount-desc" => Some(SortKey::AmountDesc),
            "amount-asc" => Some(SortKey::AmountAsc),
            "name" => Some(SortKey::Name),
            "follow-up" => Some(SortKey::FollowUp),
            _ => None,
        }
    }
}

/// Query/filter/sort parameters for a projection.
#[derive(Debug, Clone, Default)]
pub struct ViewParams {
    /// Free-text search; empty matches everything.
    pub query: String,
    /// `None` = All.
    pub status: Option<LeadStatus>,
    /// `None` = All; matched case-insensitively against the lead source.
    pub source: Option<String>,
    pub sort: SortKey,
}

/// A filtered, sorted, read-only projection plus its aggregates.
#[derive(Debug, Clone)]
pub struct Projection {
    pub leads: Vec<Lead>,
    pub count: usize,
    /// Summed loan amount over the filtered list.
    pub volume: f64,
}

/// Aggregates over the full, unfiltered collection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PipelineMetrics {
    pub total: usize,
    /// Leads whose status is not Won or Lost.
    pub active: usize,
    pub won: usize,
    pub lost: usize,
    pub won_volume: f64,
    /// won / total as a rounded percentage; 0 when the collection is empty.
    pub close_rate: u32,
    /// Overdue follow-ups (see [`is_overdue`]).
    pub overdue: usize,
}

/// Derive the projection for the given parameters. Filtering is conjunctive;
/// sorting is stable, so equal keys keep their original relative order.
pub fn project(leads: &[Lead], params: &ViewParams) -> Projection {
    let needle = params.query.trim().to_lowercase();
    let mut rows: Vec<Lead> = leads
        .iter()
        .filter(|lead| {
            matches_query(lead, &needle)
                && params.status.map_or(true, |s| lead.status == s)
                && params
                    .source
                    .as_deref()
                    .map_or(true, |s| lead.source.eq_ignore_ascii_case(s))
        })
        .cloned()
        .collect();

    match params.sort {
        SortKey::Recent => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::AmountDesc => rows.sort_by(|a, b| b.loan_amount.total_cmp(&a.loan_amount)),
        SortKey::AmountAsc => rows.sort_by(|a, b| a.loan_amount.total_cmp(&b.loan_amount)),
        SortKey::Name => rows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        SortKey::FollowUp => {
            rows.sort_by(|a, b| match (a.next_follow_up, b.next_follow_up) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
        }
    }

    let count = rows.len();
    let volume = rows.iter().map(|l| l.loan_amount).sum();
    Projection {
        leads: rows,
        count,
        volume,
    }
}

/// Pipeline metrics over the full collection, relative to the given date.
pub fn pipeline_metrics(leads: &[Lead], today: NaiveDate) -> PipelineMetrics {
    let total = leads.len();
    let won = leads.iter().filter(|l| l.status == LeadStatus::Won).count();
    let lost = leads.iter().filter(|l| l.status == LeadStatus::Lost).count();
    let won_volume = leads
        .iter()
        .filter(|l| l.status == LeadStatus::Won)
        .map(|l| l.loan_amount)
        .sum();
    let close_rate = if total == 0 {
        0
    } else {
        ((won as f64 / total as f64) * 100.0).round() as u32
    };
    let overdue = leads.iter().filter(|l| is_overdue(l, today)).count();
    PipelineMetrics {
        total,
        active: total - won - lost,
        won,
        lost,
        won_volume,
        close_rate,
        overdue,
    }
}

/// Convenience wrapper using the current local date.
pub fn pipeline_metrics_now(leads: &[Lead]) -> PipelineMetrics {
    pipeline_metrics(leads, time::today())
}

/// End-of-day overdue policy: a lead is overdue iff its follow-up date is
/// strictly before `today` and it is still in play. A follow-up dated today
/// is not overdue until the day has fully elapsed.
pub fn is_overdue(lead: &Lead, today: NaiveDate) -> bool {
    match lead.next_follow_up {
        Some(date) => date < today && !lead.status.is_terminal(),
        None => false,
    }
}

fn matches_query(lead: &Lead, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    lead.name.to_lowercase().contains(needle)
        || lead.contact.to_lowercase().contains(needle)
        || lead.source.to_lowercase().contains(needle)
        || lead.notes.to_lowercase().contains(needle)
        || lead.tags.join(" ").to_lowercase().contains(needle)
}
