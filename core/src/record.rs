//! Source records: the four immutable tables of the dataset.
//!
//! Field names on the wire follow the source column names
//! (`Provider_ID`, `Food_Name`, ...). Categorical text columns are
//! nullable; grouping drops null keys. Timestamps and expiry dates are
//! coerced leniently: anything unparseable becomes `None`.

use crate::types::{ClaimId, FoodId, ProviderId, Quantity, ReceiverId};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use std::fmt;

/// A table that a data source can produce.
pub trait SourceRecord: DeserializeOwned {
    /// Table name used in error messages and as the SQLite table name.
    const TABLE: &'static str;
    /// Columns that must be present in every source row.
    const REQUIRED: &'static [&'static str];
}

// ── Provider ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(rename = "Provider_ID")]
    pub provider_id: ProviderId,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Provider_Type", default)]
    pub provider_type: Option<String>,
    #[serde(rename = "Address", default)]
    pub address: Option<String>,
    #[serde(rename = "City", default)]
    pub city: Option<String>,
    #[serde(rename = "Contact", default)]
    pub contact: Option<String>,
}

impl Provider {
    pub fn new(
        provider_id: ProviderId,
        name: &str,
        provider_type: &str,
        city: &str,
        contact: &str,
    ) -> Self {
        Self {
            provider_id,
            name: Some(name.into()),
            provider_type: Some(provider_type.into()),
            address: None,
            city: Some(city.into()),
            contact: Some(contact.into()),
        }
    }
}

impl SourceRecord for Provider {
    const TABLE: &'static str = "providers";
    const REQUIRED: &'static [&'static str] =
        &["Provider_ID", "Name", "Provider_Type", "City", "Contact"];
}

// ── Receiver ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    #[serde(rename = "Receiver_ID")]
    pub receiver_id: ReceiverId,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Receiver_Type", default)]
    pub receiver_type: Option<String>,
    #[serde(rename = "City", default)]
    pub city: Option<String>,
    #[serde(rename = "Contact", default)]
    pub contact: Option<String>,
}

impl Receiver {
    pub fn new(receiver_id: ReceiverId, name: &str, city: &str) -> Self {
        Self {
            receiver_id,
            name: Some(name.into()),
            receiver_type: None,
            city: Some(city.into()),
            contact: None,
        }
    }
}

impl SourceRecord for Receiver {
    const TABLE: &'static str = "receivers";
    const REQUIRED: &'static [&'static str] = &["Receiver_ID", "Name", "City"];
}

// ── Food listing ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodListing {
    #[serde(rename = "Food_ID")]
    pub food_id: FoodId,
    #[serde(rename = "Food_Name", default)]
    pub food_name: Option<String>,
    #[serde(rename = "Quantity")]
    pub quantity: Quantity,
    #[serde(rename = "Expiry_Date", default, deserialize_with = "lenient_date")]
    pub expiry_date: Option<NaiveDate>,
    /// Null when the source row names no provider; such a listing joins to nothing.
    #[serde(rename = "Provider_ID", default)]
    pub provider_id: Option<ProviderId>,
    #[serde(rename = "Provider_Type", default)]
    pub provider_type: Option<String>,
    #[serde(rename = "Location", default)]
    pub location: Option<String>,
    #[serde(rename = "Food_Type", default)]
    pub food_type: Option<String>,
    #[serde(rename = "Meal_Type", default)]
    pub meal_type: Option<String>,
}

impl FoodListing {
    pub fn new(
        food_id: FoodId,
        provider_id: ProviderId,
        food_name: &str,
        provider_type: &str,
        food_type: &str,
        meal_type: &str,
        quantity: Quantity,
    ) -> Self {
        Self {
            food_id,
            food_name: Some(food_name.into()),
            quantity,
            expiry_date: None,
            provider_id: Some(provider_id),
            provider_type: Some(provider_type.into()),
            location: None,
            food_type: Some(food_type.into()),
            meal_type: Some(meal_type.into()),
        }
    }
}

impl SourceRecord for FoodListing {
    const TABLE: &'static str = "food_listings";
    const REQUIRED: &'static [&'static str] = &[
        "Food_ID",
        "Food_Name",
        "Quantity",
        "Provider_ID",
        "Provider_Type",
        "Food_Type",
        "Meal_Type",
    ];
}

// ── Claim ────────────────────────────────────────────────────────────────────

/// Lifecycle status of a claim. Unrecognised labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClaimStatus {
    Pending,
    Completed,
    Cancelled,
    Other(String),
}

impl ClaimStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ClaimStatus::Pending => "Pending",
            ClaimStatus::Completed => "Completed",
            ClaimStatus::Cancelled => "Cancelled",
            ClaimStatus::Other(label) => label,
        }
    }
}

impl From<&str> for ClaimStatus {
    fn from(label: &str) -> Self {
        match label {
            "Pending" => ClaimStatus::Pending,
            "Completed" => ClaimStatus::Completed,
            "Cancelled" => ClaimStatus::Cancelled,
            other => ClaimStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for ClaimStatus {
    fn from(label: String) -> Self {
        ClaimStatus::from(label.as_str())
    }
}

impl From<ClaimStatus> for String {
    fn from(status: ClaimStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(rename = "Claim_ID")]
    pub claim_id: ClaimId,
    #[serde(rename = "Food_ID", default)]
    pub food_id: Option<FoodId>,
    #[serde(rename = "Receiver_ID", default)]
    pub receiver_id: Option<ReceiverId>,
    #[serde(rename = "Status", default)]
    pub status: Option<ClaimStatus>,
    #[serde(rename = "Timestamp", default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<NaiveDateTime>,
}

impl Claim {
    pub fn new(
        claim_id: ClaimId,
        food_id: FoodId,
        receiver_id: ReceiverId,
        status: &str,
        timestamp: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            claim_id,
            food_id: Some(food_id),
            receiver_id: Some(receiver_id),
            status: Some(ClaimStatus::from(status)),
            timestamp,
        }
    }

    /// Build a claim from a raw timestamp string, coercing it like a source load would.
    pub fn with_raw_timestamp(
        claim_id: ClaimId,
        food_id: FoodId,
        receiver_id: ReceiverId,
        status: &str,
        raw_timestamp: &str,
    ) -> Self {
        Self::new(
            claim_id,
            food_id,
            receiver_id,
            status,
            parse_timestamp(raw_timestamp),
        )
    }

    pub fn is_completed(&self) -> bool {
        self.status == Some(ClaimStatus::Completed)
    }

    pub fn claim_date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date())
    }
}

impl SourceRecord for Claim {
    const TABLE: &'static str = "claims";
    const REQUIRED: &'static [&'static str] =
        &["Claim_ID", "Food_ID", "Receiver_ID", "Status", "Timestamp"];
}

// ── Lenient coercion ─────────────────────────────────────────────────────────

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse an ISO-8601-like date or datetime. Returns `None` for anything else.
///
/// Offsets are dropped: the wall-clock time as written is kept, so the
/// calendar date used for range filtering is the one in the source text.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    parse_date(raw).map(|d| d.and_time(NaiveTime::MIN))
}

/// Parse a calendar date in one of the accepted date-only layouts.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Coerce a date column that may also hold full timestamps.
pub fn coerce_date(raw: &str) -> Option<NaiveDate> {
    parse_date(raw).or_else(|| parse_timestamp(raw).map(|ts| ts.date()))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => parse_timestamp(&s),
        _ => None,
    })
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => coerce_date(&s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn parses_common_timestamp_layouts() {
        let expected = ymd_hms(2025, 3, 5, 14, 30, 0);
        assert_eq!(parse_timestamp("2025-03-05 14:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-05T14:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-05 14:30"), Some(expected));
        assert_eq!(parse_timestamp("03/05/2025 14:30"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-05T14:30:00+05:30"), Some(expected));
    }

    #[test]
    fn date_only_means_midnight() {
        assert_eq!(
            parse_timestamp("2025-03-05"),
            Some(ymd_hms(2025, 3, 5, 0, 0, 0))
        );
    }

    #[test]
    fn garbage_timestamps_become_none() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("2025-13-45 99:99"), None);
    }

    #[test]
    fn claim_status_round_trips_unknown_labels() {
        assert_eq!(ClaimStatus::from("Completed"), ClaimStatus::Completed);
        let odd = ClaimStatus::from("On Hold");
        assert_eq!(odd.as_str(), "On Hold");
        assert_eq!(String::from(odd), "On Hold");
    }

    #[test]
    fn raw_timestamps_coerce_like_a_source_load() {
        let timed = Claim::with_raw_timestamp(1, 2, 3, "Completed", "2025-03-05 14:30:00");
        assert_eq!(timed.claim_date(), NaiveDate::from_ymd_opt(2025, 3, 5));
        assert!(timed.is_completed());
        let untimed = Claim::with_raw_timestamp(1, 2, 3, "Pending", "n/a");
        assert_eq!(untimed.claim_date(), None);
    }

    #[test]
    fn expiry_dates_accept_full_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 5);
        assert_eq!(coerce_date("2025-03-05"), expected);
        assert_eq!(coerce_date("03/05/2025"), expected);
        assert_eq!(coerce_date("2025-03-05T08:00:00"), expected);
        assert_eq!(coerce_date("tomorrow"), None);
    }

    #[test]
    fn null_foreign_keys_deserialize_as_none() {
        let claim: Claim = serde_json::from_str(
            r#"{"Claim_ID":1,"Food_ID":null,"Receiver_ID":3,"Status":"Pending","Timestamp":null}"#,
        )
        .unwrap();
        assert_eq!(claim.food_id, None);
        assert_eq!(claim.receiver_id, Some(3));

        let listing: FoodListing = serde_json::from_str(
            r#"{"Food_ID":1,"Food_Name":"Rice","Quantity":2,"Provider_ID":null,
                "Provider_Type":"Household","Food_Type":"Vegan","Meal_Type":"Lunch"}"#,
        )
        .unwrap();
        assert_eq!(listing.provider_id, None);
    }

    #[test]
    fn claim_deserializes_with_unparseable_timestamp() {
        let claim: Claim = serde_json::from_str(
            r#"{"Claim_ID":1,"Food_ID":2,"Receiver_ID":3,"Status":"Pending","Timestamp":"soon"}"#,
        )
        .unwrap();
        assert_eq!(claim.timestamp, None);
        assert_eq!(claim.status, Some(ClaimStatus::Pending));
    }
}
