//! Phone number canonicalization.
//!
//! The canonical key is the last ten digits (the national significant number).
//! Inputs that carry a country code keep it in the international form;
//! bare national numbers default to `+91`.

/// Default country calling code for bare national numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "91";

const NATIONAL_LEN: usize = 10;

/// A phone number in its canonical forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPhone {
    /// Ten-digit national number, used as the unique key.
    pub national: String,
    /// International form with a leading `+`.
    pub e164: String,
}

/// Canonicalize a raw phone value. Returns `None` when fewer than ten digits remain.
pub fn normalize_phone(raw: Option<&str>) -> Option<CanonicalPhone> {
    let digits: String = raw?.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() < NATIONAL_LEN {
        return None;
    }

    let national = digits[digits.len() - NATIONAL_LEN..].to_string();
    let e164 = match digits.len() {
        NATIONAL_LEN => format!("+{}{}", DEFAULT_COUNTRY_CODE, digits),
        11 if digits.starts_with('0') => format!("+{}{}", DEFAULT_COUNTRY_CODE, national),
        _ => format!("+{}", digits),
    };

    Some(CanonicalPhone { national, e164 })
}
