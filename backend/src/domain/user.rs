//! Registered user entity.
//!
//! A user couples a display name with a validated [`Email`] and an optional
//! [`NationalId`]. Identifiers are assigned by storage; a user built by
//! [`User::transient`] has none until it is saved.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::email::Email;
use super::error::Error;
use super::national_id::NationalId;

/// Storage-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw storage identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors raised by user mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("name must not be blank")]
    BlankName,
}

impl UserValidationError {
    /// Stable machine-readable code for the failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BlankName => "blank_name",
        }
    }
}

/// Registered user.
///
/// ## Invariants
/// - `email` is always present and valid.
/// - `id`, once assigned by storage, never changes.
/// - Mutators keep `name` non-blank; only the storage round trip or
///   [`User::transient`] can produce a blank name, which [`User::is_valid`]
///   reports.
///
/// Two persisted users are equal when their identifiers match. Users without
/// an identifier compare every field.
///
/// # Examples
/// ```
/// use user_registry::domain::{Email, User};
///
/// let email = Email::new("ana@example.com").expect("valid email");
/// let user = User::transient("Ana", email, None);
/// assert!(user.is_valid());
/// assert!(!user.has_national_id());
/// assert!(user.id().is_none());
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: Option<UserId>,
    name: String,
    email: Email,
    national_id: Option<NationalId>,
}

impl From<UserValidationError> for Error {
    fn from(err: UserValidationError) -> Self {
        Self::validation_failed(err.to_string()).with_details(json!({
            "field": "name",
            "code": err.code(),
        }))
    }
}

impl User {
    /// Build a user with every field supplied, typically when loading from storage.
    #[must_use]
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: Email,
        national_id: Option<NationalId>,
    ) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            email,
            national_id,
        }
    }

    /// Build a user that has not been persisted yet.
    #[must_use]
    pub fn transient(name: impl Into<String>, email: Email, national_id: Option<NationalId>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email,
            national_id,
        }
    }

    /// Parse raw strings into a user.
    ///
    /// A missing or blank `national_id` leaves the field empty.
    ///
    /// # Errors
    /// Propagates the [`Email`] or [`NationalId`] validation failure as an
    /// [`Error`] with code `InvalidValue`.
    pub fn from_strings(
        id: Option<UserId>,
        name: impl Into<String>,
        email: &str,
        national_id: Option<&str>,
    ) -> Result<Self, Error> {
        let email = Email::new(email)?;
        let national_id = parse_optional_national_id(national_id)?;
        Ok(Self {
            id,
            name: name.into(),
            email,
            national_id,
        })
    }

    /// Storage identifier, absent before the first save.
    #[must_use]
    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Email address.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Email address as text.
    #[must_use]
    pub fn email_as_str(&self) -> &str {
        self.email.as_str()
    }

    /// National identifier, when registered.
    #[must_use]
    pub fn national_id(&self) -> Option<&NationalId> {
        self.national_id.as_ref()
    }

    /// National identifier digits, when registered.
    #[must_use]
    pub fn national_id_as_str(&self) -> Option<&str> {
        self.national_id.as_ref().map(NationalId::as_str)
    }

    /// Whether a national identifier is registered.
    #[must_use]
    pub fn has_national_id(&self) -> bool {
        self.national_id.is_some()
    }

    /// Whether storage has assigned an identifier.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// A user is valid when its name has non-whitespace content.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Replace the display name.
    ///
    /// # Errors
    /// Returns [`UserValidationError::BlankName`] and leaves the user
    /// unchanged when `name` is blank.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::BlankName);
        }
        self.name = name;
        Ok(())
    }

    /// Replace the email address.
    pub fn reassign_email(&mut self, email: Email) {
        self.email = email;
    }

    /// Parse and replace the email address.
    ///
    /// # Errors
    /// Returns the email validation failure and leaves the user unchanged.
    pub fn reassign_email_from_str(&mut self, email: &str) -> Result<(), Error> {
        self.email = Email::new(email)?;
        Ok(())
    }

    /// Replace or clear the national identifier.
    pub fn reassign_national_id(&mut self, national_id: Option<NationalId>) {
        self.national_id = national_id;
    }

    /// Parse and replace the national identifier; blank input clears it.
    ///
    /// # Errors
    /// Returns the national identifier validation failure and leaves the
    /// user unchanged.
    pub fn reassign_national_id_from_str(&mut self, national_id: Option<&str>) -> Result<(), Error> {
        self.national_id = parse_optional_national_id(national_id)?;
        Ok(())
    }
}

fn parse_optional_national_id(raw: Option<&str>) -> Result<Option<NationalId>, Error> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => Ok(Some(NationalId::new(raw)?)),
        _ => Ok(None),
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(left), Some(right)) => left == right,
            _ => {
                self.id == other.id
                    && self.name == other.name
                    && self.email == other.email
                    && self.national_id == other.national_id
            }
        }
    }
}

impl Eq for User {}

#[cfg(test)]
mod tests;
