//! Driving port for read-only user projections.
//!
//! Read paths skip the registration service and go straight to storage. The
//! projections are plain data: no entity invariants are re-checked.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Error, NationalId, UserId};

/// Row in the user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Single-user projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub national_id: Option<String>,
}

impl UserDetails {
    /// Stored digits rendered as `XXX.XXX.XXX-XX`, when they still parse.
    #[must_use]
    pub fn national_id_formatted(&self) -> Option<String> {
        self.national_id
            .as_deref()
            .and_then(|raw| NationalId::new(raw).ok())
            .map(|id| id.formatted())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every user, ordered by identifier.
    async fn list_users(&self) -> Result<Vec<UserSummary>, Error>;

    /// A single user, or `None`.
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserDetails>, Error>;

    /// A single user by email. The input is trimmed and lower-cased but not
    /// validated.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserDetails>, Error>;

    /// Number of stored users.
    async fn count(&self) -> Result<u64, Error>;
}

/// Normalise free-form email text for lookups.
#[must_use]
pub fn normalise_email_lookup(email: &str) -> String {
    email.trim().to_lowercase()
}
