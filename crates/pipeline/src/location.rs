//! State, country and city extraction from raw location fields.
//!
//! City recognition is a plain substring scan over a small, fixed gazetteer.
//! It can report a city whose name merely appears inside another word, and
//! cities outside the gazetteer are never recognized.

use crate::normalize::{normalize_text, title_case};

/// Known city names, in match priority order.
pub const KNOWN_CITIES: &[&str] = &[
    "pune",
    "mumbai",
    "nashik",
    "nagpur",
    "solapur",
    "kolhapur",
    "satara",
    "ahmednagar",
    "jalgaon",
    "thane",
];

/// Location fields derived from a single input row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Title-cased gazetteer entry.
    pub city: Option<String>,
    /// Normalized first token of the compound area field.
    pub state: Option<String>,
    /// Normalized second token of the compound area field.
    pub country: Option<String>,
}

/// Raw text fields the extractor reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationFields<'a> {
    pub address: Option<&'a str>,
    pub result_loc: Option<&'a str>,
    /// Compound "State, Country" field.
    pub belong_area: Option<&'a str>,
}

/// Split a compound "State, Country" field into its first two tokens.
pub fn extract_state_country(belong_area: Option<&str>) -> (Option<String>, Option<String>) {
    let normalized = normalize_text(belong_area);
    let mut parts = normalized.split(',').map(str::trim);

    let state = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
    let country = parts.next().filter(|s| !s.is_empty()).map(str::to_string);

    (state, country)
}

/// Return the first gazetteer city found anywhere in the given fields.
pub fn extract_city(fields: &LocationFields<'_>) -> Option<String> {
    let text = [fields.address, fields.result_loc, fields.belong_area]
        .into_iter()
        .map(normalize_text)
        .collect::<Vec<_>>()
        .join(" ");

    KNOWN_CITIES
        .iter()
        .find(|city| text.contains(*city))
        .map(|city| title_case(city))
}

/// Extract every location field from a row.
pub fn extract_location(fields: &LocationFields<'_>) -> Location {
    let (state, country) = extract_state_country(fields.belong_area);
    Location {
        city: extract_city(fields),
        state,
        country,
    }
}
