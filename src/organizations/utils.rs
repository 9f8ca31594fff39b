//! Internal utilities for the organizations module.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Result, TenancyError};

/// Get current Unix timestamp in seconds.
#[inline]
pub(crate) fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Basic email format validation.
///
/// Checks that the email:
/// - Contains exactly one `@` symbol
/// - Has at least one character before `@`
/// - Has at least one `.` after `@`, not at either end of the domain
///
/// This is not RFC 5322 compliant but catches obvious formatting errors.
#[inline]
pub(crate) fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Trim, lowercase and validate an email address.
pub(crate) fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(TenancyError::validation("email required"));
    }
    if !is_valid_email(&email) {
        return Err(TenancyError::validation(format!(
            "invalid email format: {email}"
        )));
    }
    Ok(email)
}

/// Trim a display name and check it is present and short enough.
pub(crate) fn normalize_name(field: &str, name: &str, max_len: usize) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TenancyError::validation(format!("{field} required")));
    }
    if name.chars().count() > max_len {
        return Err(TenancyError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name@example.com"));
        assert!(is_valid_email("user@sub.example.com"));
        assert!(is_valid_email("user+tag@example.com"));
        assert!(is_valid_email("x@x.com"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("user"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@.example.com"));
        assert!(!is_valid_email("user@example."));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Bob@Example.COM ").unwrap(), "bob@example.com");
        assert!(matches!(normalize_email("   "), Err(TenancyError::Validation(_))));
        assert!(matches!(normalize_email("bob"), Err(TenancyError::Validation(_))));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("name", "  Acme  ", 120).unwrap(), "Acme");

        let err = normalize_name("name", " ", 120).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: name required");

        assert!(normalize_name("name", "abcd", 3).is_err());
        assert!(normalize_name("name", "äöü", 3).is_ok());
    }
}
