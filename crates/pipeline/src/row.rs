//! Mapping raw input rows to writable contacts.

use std::collections::BTreeMap;

use database::{NewContact, ValidationError};
use serde_json::{Map, Value};

use crate::classify::{classify, TargetRegion};
use crate::error::IngestError;
use crate::location::{extract_location, LocationFields};
use crate::phone::normalize_phone;

/// Column names accepted for the phone field, in priority order.
pub const PHONE_COLUMNS: &[&str] = &[
    "number",
    "phone",
    "tel_number",
    "phone_number",
    "mobile",
    "msisdn",
];

/// Column names accepted for a top-level street address, in priority order.
pub const ADDRESS_COLUMNS: &[&str] = &["address", "addr", "street"];

/// Column names accepted for the raw upstream payload.
pub const PAYLOAD_COLUMNS: &[&str] = &["raw_db1_summary", "raw"];

/// One input row: column name to optional text value.
///
/// Column lookups are case-insensitive and empty cells read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: BTreeMap<String, Option<String>>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from header/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Self::new();
        for (k, v) in pairs {
            row.insert(k, Some(v.into()));
        }
        row
    }

    /// Set a column value.
    pub fn insert(&mut self, column: impl Into<String>, value: Option<String>) {
        let column = column.into().trim().to_lowercase();
        self.fields.insert(column, value);
    }

    /// Get a non-blank column value.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(&column.to_lowercase())
            .and_then(|v| v.as_deref())
            .filter(|v| !v.trim().is_empty())
    }

    /// Get the first non-blank value among several column aliases.
    pub fn first_of(&self, columns: &[&str]) -> Option<&str> {
        columns.iter().find_map(|c| self.get(c))
    }

    /// The raw phone value, if any alias column is present.
    pub fn phone(&self) -> Option<&str> {
        self.first_of(PHONE_COLUMNS)
    }

    /// Parse the upstream payload column into a JSON object.
    ///
    /// Missing or malformed payloads yield an empty object.
    pub fn payload(&self) -> Map<String, Value> {
        self.first_of(PAYLOAD_COLUMNS)
            .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
            .and_then(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default()
    }
}

/// Read a payload string field, ignoring blanks and non-string values.
fn payload_str<'a>(payload: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Read a payload scalar as text, stringifying numbers and booleans.
fn payload_text(payload: &Map<String, Value>, key: &str) -> Option<String> {
    match payload.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Interpret a payload value as a truthy flag.
fn payload_flag(payload: &Map<String, Value>, key: &str) -> Option<bool> {
    match payload.get(key)? {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => Some(!s.is_empty()),
        Value::Array(a) => Some(!a.is_empty()),
        Value::Object(o) => Some(!o.is_empty()),
    }
}

/// Interpret a payload value as a number.
fn payload_f64(payload: &Map<String, Value>, key: &str) -> Option<f64> {
    match payload.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn payload_i64(payload: &Map<String, Value>, key: &str) -> Option<i64> {
    match payload.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Normalize, extract and classify one row into a writable contact.
///
/// Derived fields are computed from this row alone.
pub fn prepare_contact(
    row: &RawRow,
    target: &TargetRegion,
    batch_id: Option<&str>,
) -> Result<NewContact, IngestError> {
    let phone = normalize_phone(row.phone()).ok_or_else(|| match row.phone() {
        Some(raw) => ValidationError::InvalidPhone(format!("'{}' has fewer than 10 digits", raw)),
        None => ValidationError::Empty("phone".to_string()),
    })?;

    let payload = row.payload();

    // Payload first, then the row's own columns, then the lookup location.
    let address = payload_str(&payload, "address")
        .or_else(|| row.first_of(ADDRESS_COLUMNS))
        .or_else(|| row.get("result_loc"));
    let belong_area = payload_str(&payload, "belong_area")
        .or_else(|| row.get("belong_area"))
        .or_else(|| row.get("result_loc"));
    let result_loc = row
        .get("result_loc")
        .or_else(|| payload_str(&payload, "belong_area"))
        .or_else(|| row.get("belong_area"));

    let location = extract_location(&LocationFields {
        address,
        result_loc,
        belong_area,
    });
    let classification = classify(target, location.city.as_deref(), location.state.as_deref());

    let e164_phone = payload_str(&payload, "e164_tel_number")
        .or_else(|| payload_str(&payload, "format_tel_number"))
        .map(str::to_string)
        .unwrap_or(phone.e164);

    let timestamp_ms = row
        .get("processed_at")
        .map(str::trim)
        .filter(|s| s.chars().all(|c| c.is_ascii_digit()))
        .and_then(|s| s.parse().ok());

    Ok(NewContact {
        phone: phone.national,
        e164_phone: Some(e164_phone),
        timestamp_ms,
        batch_id: batch_id.map(str::to_string),
        uid: row.get("uid").map(str::to_string),
        lookup_success: payload_flag(&payload, "status"),
        lookup_confidence: payload_f64(&payload, "confidence"),
        lookup_latency_ms: payload_i64(&payload, "latency_ms"),
        name: payload_str(&payload, "name")
            .or_else(|| row.get("result_name"))
            .map(str::to_string),
        operator: payload_text(&payload, "operator"),
        phone_type: payload_text(&payload, "type"),
        website: payload_text(&payload, "website"),
        address: address.map(str::to_string),
        result_loc: result_loc.map(str::to_string),
        belong_area: belong_area.map(str::to_string),
        city: location.city,
        state: location.state,
        country: location.country,
        is_target: classification.is_target,
        category: classification.category,
        raw_json: Value::Object(payload).to_string(),
    })
}
