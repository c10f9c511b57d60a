use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NewsletterError {
    #[error("email address cannot be empty")]
    EmptyEmail,

    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),
}

/// Result of a newsletter sign-up. Re-subscribing is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscribeOutcome {
    Subscribed,
    AlreadySubscribed,
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
    })
}

/// Trims and lowercases `raw`, then checks it has the shape `local@domain.tld`.
///
/// # Errors
///
/// Returns [`NewsletterError::EmptyEmail`] for blank input and
/// [`NewsletterError::InvalidEmail`] when the shape does not match.
pub fn validate_email(raw: &str) -> Result<String, NewsletterError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(NewsletterError::EmptyEmail);
    }
    if !email_regex().is_match(&email) {
        return Err(NewsletterError::InvalidEmail(email));
    }
    Ok(email)
}
