//! Email address value type.
//!
//! Addresses are trimmed and lower-cased before validation, so two inputs
//! that differ only in case or surrounding whitespace produce equal values.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::Error;

/// Validation errors returned by [`Email::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    #[error("email must not be empty")]
    Empty,
    #[error("email is not valid: {input}")]
    Malformed { input: String },
}

impl EmailValidationError {
    /// Stable machine-readable code for the failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty_email",
            Self::Malformed { .. } => "malformed_email",
        }
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised, validated email address.
///
/// ## Invariants
/// - Non-empty, contains exactly one `@`.
/// - Stored in lower case without surrounding whitespace.
/// - The domain ends in a label of at least two letters.
///
/// # Examples
/// ```
/// use user_registry::domain::Email;
///
/// let email = Email::new("  Ana@Example.COM ").expect("valid email");
/// assert_eq!(email.as_str(), "ana@example.com");
/// assert_eq!(email.domain(), "example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    ///
    /// # Errors
    /// Returns [`EmailValidationError::Empty`] for blank input and
    /// [`EmailValidationError::Malformed`] when the normalised text does not
    /// look like `local@domain.tld`.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }

        let normalised = trimmed.to_lowercase();
        if !email_regex().is_match(&normalised) {
            return Err(EmailValidationError::Malformed {
                input: raw.as_ref().to_owned(),
            });
        }

        Ok(Self(normalised))
    }

    /// Borrow the normalised address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Text before the `@`.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or("", |(local, _)| local)
    }

    /// Text after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }

    /// Case-insensitive comparison against the address domain.
    #[must_use]
    pub fn is_from_domain(&self, domain: &str) -> bool {
        self.domain().eq_ignore_ascii_case(domain)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = EmailValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl From<EmailValidationError> for Error {
    fn from(err: EmailValidationError) -> Self {
        Self::invalid_value(err.to_string()).with_details(json!({
            "field": "email",
            "code": err.code(),
        }))
    }
}
