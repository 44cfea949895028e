//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{MarketError, MarketResult};

/// Validate email
pub fn validate_email(email: &str) -> MarketResult<()> {
    if email.is_empty() {
        return Err(MarketError::validation("Email is required"));
    }

    if email.len() > 254 {
        return Err(MarketError::validation(
            "Email must be at most 254 characters long",
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(MarketError::validation("Invalid email format"));
    }

    Ok(())
}

/// Validate an admin password
pub fn validate_password(password: &str) -> MarketResult<()> {
    if password.is_empty() {
        return Err(MarketError::validation("Password is required"));
    }

    if password.len() < 8 {
        return Err(MarketError::validation(
            "Password must be at least 8 characters long",
        ));
    }

    if password.len() > 128 {
        return Err(MarketError::validation(
            "Password must be at most 128 characters long",
        ));
    }

    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_letter || !has_digit {
        return Err(MarketError::validation(
            "Password must contain at least one letter and one digit",
        ));
    }

    Ok(())
}

/// Trimmed value of a required text field
pub fn required(value: &str, field: &str) -> MarketResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(MarketError::validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// Trimmed value of an optional text field; blank becomes `None`
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("buyer@agribuyx.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("harvest2024").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("onlyletters").is_err());
        assert!(validate_password("12345678").is_err());
    }

    #[test]
    fn test_required_and_optional() {
        assert_eq!(required("  Seeds ", "Name").unwrap(), "Seeds");
        assert_eq!(
            required(" ", "Name"),
            Err(MarketError::validation("Name is required"))
        );
        assert_eq!(optional(Some("  ")), None);
        assert_eq!(optional(Some(" x ")).as_deref(), Some("x"));
        assert_eq!(optional(None), None);
    }
}
