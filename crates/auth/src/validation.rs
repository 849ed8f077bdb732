//! Input checks shared by the registration flows.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::AuthError;

pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_REGEX: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));

/// Trimmed value of an optional field, `None` when missing or blank.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

pub fn validate_email(email: &str) -> Result<(), AuthError> {
    let email_regex = EMAIL_REGEX
        .as_ref()
        .map_err(|_| AuthError::Validation("Invalid email regex".into()))?;

    if email_regex.is_match(email) {
        Ok(())
    } else {
        Err(AuthError::Validation("Invalid email format".into()))
    }
}

pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        assert!(validate_email("donor@example.org").is_ok());
        assert!(validate_email("first.last+tag@sub.example.co").is_ok());
        assert!(validate_email("no-at-sign.example.org").is_err());
        assert!(validate_email("two words@example.org").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_present_trims_blank_values() {
        assert_eq!(present(&Some("  name ".into())), Some("name"));
        assert_eq!(present(&Some("   ".into())), None);
        assert_eq!(present(&None), None);
    }
}
