//! Returning-candidate detection.
//!
//! Check-then-insert without a uniqueness constraint: two simultaneous starts
//! with the same email can both pass.

use std::sync::OnceLock;

use regex::Regex;

static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email.trim()))
}

/// True when the email already has a response for this interview, or when a
/// non-empty respondents allow-list does not contain it.
pub fn has_already_responded(
    email: &str,
    stored_emails: &[String],
    respondents: Option<&[String]>,
) -> bool {
    let email = normalize_email(email);
    if stored_emails.iter().any(|e| normalize_email(e) == email) {
        return true;
    }
    match respondents {
        Some(list) if !list.is_empty() => !list.iter().any(|e| normalize_email(e) == email),
        _ => false,
    }
}
