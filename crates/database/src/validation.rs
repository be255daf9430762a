//! Input validation for contact keys and fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(String),
    /// Invalid phone key format.
    InvalidPhone(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::InvalidPhone(msg) => write!(f, "Invalid phone: {}", msg),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for the phone key.
pub const MAX_PHONE_LENGTH: usize = 20;

/// Maximum allowed length for the category label.
pub const MAX_CATEGORY_LENGTH: usize = 64;

/// Validate the unique phone key of a contact.
///
/// The key must be non-blank, at most [`MAX_PHONE_LENGTH`] characters and
/// made of ASCII digits only.
pub fn validate_phone_key(phone: &str) -> Result<(), ValidationError> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Empty("phone".to_string()));
    }

    if phone.len() > MAX_PHONE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: MAX_PHONE_LENGTH,
            actual: phone.len(),
        });
    }

    if let Some(c) = phone.chars().find(|c| !c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPhone(format!(
            "unexpected character '{}' (digits only)",
            c
        )));
    }

    Ok(())
}

/// Validate a category label.
pub fn validate_category(category: &str) -> Result<(), ValidationError> {
    if category.trim().is_empty() {
        return Err(ValidationError::Empty("category".to_string()));
    }

    if category.len() > MAX_CATEGORY_LENGTH {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: MAX_CATEGORY_LENGTH,
            actual: category.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone_key_valid() {
        assert!(validate_phone_key("1234567890").is_ok());
        assert!(validate_phone_key(" 9876543210 ").is_ok()); // trimmed
    }

    #[test]
    fn test_validate_phone_key_invalid() {
        assert!(matches!(
            validate_phone_key(""),
            Err(ValidationError::Empty(_))
        ));

        assert!(matches!(
            validate_phone_key("   "),
            Err(ValidationError::Empty(_))
        ));

        assert!(matches!(
            validate_phone_key("+911234567890"),
            Err(ValidationError::InvalidPhone(_))
        ));

        let long = "1".repeat(30);
        assert!(matches!(
            validate_phone_key(&long),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category("Pune").is_ok());
        assert!(matches!(
            validate_category(""),
            Err(ValidationError::Empty(_))
        ));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::Empty("phone".to_string());
        assert_eq!(err.to_string(), "phone cannot be empty");

        let err = ValidationError::TooLong {
            field: "phone".to_string(),
            max: 20,
            actual: 30,
        };
        assert_eq!(err.to_string(), "phone is too long (30 chars, max 20)");
    }
}
