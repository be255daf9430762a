//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored contact, keyed by its canonical phone number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Canonical national phone number (unique).
    pub phone: String,
    /// International form, e.g. "+911234567890".
    pub e164_phone: Option<String>,
    /// Upstream processing time in epoch milliseconds.
    pub timestamp_ms: Option<i64>,
    /// Source batch identifier.
    pub batch_id: Option<String>,
    /// Upstream row identifier.
    pub uid: Option<String>,
    /// Whether the upstream lookup succeeded.
    pub lookup_success: Option<bool>,
    /// Upstream lookup confidence.
    pub lookup_confidence: Option<f64>,
    /// Upstream lookup latency.
    pub lookup_latency_ms: Option<i64>,
    pub name: Option<String>,
    pub operator: Option<String>,
    pub phone_type: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub result_loc: Option<String>,
    pub belong_area: Option<String>,
    /// Derived city (title-cased gazetteer entry).
    pub city: Option<String>,
    /// Derived state (normalized).
    pub state: Option<String>,
    /// Derived country (normalized).
    pub country: Option<String>,
    /// Whether the contact is in the target city.
    pub is_target: bool,
    /// Derived category label.
    pub category: String,
    /// Raw upstream payload as a JSON object.
    pub raw_json: String,
    /// First insert timestamp.
    pub created_at: String,
    /// Last write timestamp.
    pub updated_at: String,
}

/// A fully normalized and classified contact, ready to be written.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewContact {
    pub phone: String,
    pub e164_phone: Option<String>,
    pub timestamp_ms: Option<i64>,
    pub batch_id: Option<String>,
    pub uid: Option<String>,
    pub lookup_success: Option<bool>,
    pub lookup_confidence: Option<f64>,
    pub lookup_latency_ms: Option<i64>,
    pub name: Option<String>,
    pub operator: Option<String>,
    pub phone_type: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub result_loc: Option<String>,
    pub belong_area: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub is_target: bool,
    pub category: String,
    pub raw_json: String,
}

/// Number of contacts carrying a category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Contacts first stored on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DailyCount {
    /// `YYYY-MM-DD`.
    pub day: String,
    pub count: i64,
}
