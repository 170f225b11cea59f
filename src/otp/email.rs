//! Email normalization and format validation for the OTP flows.

use regex::Regex;

use super::error::OtpError;

/// Upper bound from RFC 5321 on the full address.
const MAX_EMAIL_LENGTH: usize = 254;

/// Normalize an email for lookup and rate-limit keying.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input. Requires a `.` in
/// the domain part.
fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Validate a normalized email, reporting the first violated rule.
///
/// # Errors
/// Returns `OtpError::Validation` naming the first failed rule.
pub(crate) fn validate_email(email_normalized: &str) -> Result<(), OtpError> {
    if email_normalized.is_empty() {
        return Err(OtpError::Validation(
            "Email address is required".to_string(),
        ));
    }
    if email_normalized.len() > MAX_EMAIL_LENGTH {
        return Err(OtpError::Validation(
            "Email address is too long".to_string(),
        ));
    }
    if !valid_email(email_normalized) {
        return Err(OtpError::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }
    Ok(())
}
