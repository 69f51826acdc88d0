//! Tolerant deserializers for the durable-storage and import schemas.
//!
//! The lead schema carries no version field; forward/backward compatibility
//! comes entirely from defaulting here: numeric ids are stringified, string
//! amounts are parsed, malformed dates collapse to "no date", and tag lists
//! accept either an array or a comma-joined string.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::model::sanitize_amount;
use crate::normalize::{parse_date, parse_tags};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Num(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsInput {
    List(Vec<StringOrNumber>),
    Joined(String),
}

/// Opaque id: accepts a JSON string or number, stringified; null is blank.
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?
        .map(StringOrNumber::into_string)
        .unwrap_or_default())
}

/// Optional id: `null` and blank strings count as absent.
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(raw
        .map(StringOrNumber::into_string)
        .filter(|id| !id.trim().is_empty()))
}

fn coerce_amount(raw: NumberOrString) -> f64 {
    match raw {
        NumberOrString::Num(n) => sanitize_amount(n),
        NumberOrString::Text(s) => sanitize_amount(s.trim().parse().unwrap_or(0.0)),
    }
}

/// Loan amount: number or numeric string; anything else coerces to 0.
pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrString>::deserialize(deserializer)?
        .map(coerce_amount)
        .unwrap_or(0.0))
}

pub fn opt_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrString>::deserialize(deserializer)?.map(coerce_amount))
}

fn coerce_tags(raw: TagsInput) -> Vec<String> {
    match raw {
        TagsInput::List(items) => items
            .into_iter()
            .map(StringOrNumber::into_string)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        TagsInput::Joined(s) => parse_tags(&s),
    }
}

/// Tag list: array of strings (trimmed, empties dropped) or a comma-joined
/// string. Duplicates are preserved in input order.
pub fn tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TagsInput>::deserialize(deserializer)?
        .map(coerce_tags)
        .unwrap_or_default())
}

pub fn opt_tags<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TagsInput>::deserialize(deserializer)?.map(coerce_tags))
}

/// Date-only field: `YYYY-MM-DD` string; null, empty, or unparseable input
/// yields no date.
pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

/// Patch-style date: a present field always takes effect, so `null`/`""`
/// clears while an absent field leaves the date unchanged.
pub fn opt_opt_date<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(Some(raw.as_deref().and_then(parse_date)))
}

fn coerce_millis(raw: StringOrNumber) -> i64 {
    match raw {
        StringOrNumber::Int(n) => n,
        StringOrNumber::Float(n) if n.is_finite() => n as i64,
        StringOrNumber::Float(_) => 0,
        StringOrNumber::Text(s) => s.trim().parse().unwrap_or(0),
    }
}

/// Epoch-millisecond timestamp: number or numeric string, 0 otherwise.
pub fn millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?
        .map(coerce_millis)
        .unwrap_or(0))
}

pub fn opt_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(coerce_millis))
}

#[cfg(test)]
mod tests {
    use crate::model::{Lead, LeadPatch};

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let lead: Lead = serde_json::from_str(
            r#"{"name":"A","loanAmount":null,"tags":null,"nextFollowUp":null}"#,
        )
        .unwrap();
        assert_eq!(lead.loan_amount, 0.0);
        assert!(lead.tags.is_empty());
        assert_eq!(lead.next_follow_up, None);
    }

    #[test]
    fn test_tags_accept_joined_string() {
        let lead: Lead = serde_json::from_str(r#"{"name":"A","tags":"vip, refi , ,vip"}"#).unwrap();
        assert_eq!(lead.tags, vec!["vip", "refi", "vip"]);
    }

    #[test]
    fn test_patch_present_empty_date_clears() {
        let patch: LeadPatch = serde_json::from_str(r#"{"nextFollowUp":""}"#).unwrap();
        assert_eq!(patch.next_follow_up, Some(None));

        let patch: LeadPatch = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(patch.next_follow_up, None);
    }

    #[test]
    fn test_patch_numeric_created_at_string() {
        let patch: LeadPatch = serde_json::from_str(r#"{"createdAt":"1700000000000"}"#).unwrap();
        assert_eq!(patch.created_at, Some(1_700_000_000_000));
    }

    #[test]
    fn test_malformed_date_collapses_to_none() {
        let lead: Lead =
            serde_json::from_str(r#"{"name":"A","nextFollowUp":"not-a-date"}"#).unwrap();
        assert_eq!(lead.next_follow_up, None);
    }
}
