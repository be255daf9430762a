//! Canonical comparison forms for free text.

/// Normalize an optional text value: trim, collapse inner whitespace, lowercase.
///
/// Absent input yields an empty string.
pub fn normalize_text(value: Option<&str>) -> String {
    match value {
        Some(s) => s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase(),
        None => String::new(),
    }
}

/// Capitalize the first letter of every alphabetic run and lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}
