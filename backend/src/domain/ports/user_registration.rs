//! Driving port for user registration commands.
//!
//! Inbound adapters call this port for every state-changing operation and for
//! lookups that must return full [`User`] entities.

use async_trait::async_trait;

use crate::domain::{Email, Error, NationalId, User, UserId};

/// Input for [`UserRegistration::create`].
///
/// Every field is required; the options let the service report which one was
/// missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub national_id: Option<NationalId>,
}

impl CreateUserRequest {
    /// Request with every field supplied.
    pub fn new(name: impl Into<String>, email: Email, national_id: NationalId) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email),
            national_id: Some(national_id),
        }
    }
}

/// Input for [`UserRegistration::update`].
///
/// `None` leaves a field unchanged. For `national_id`, `Some(None)` clears the
/// stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub national_id: Option<Option<NationalId>>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistration: Send + Sync {
    /// Register a new user, rejecting emails that are already taken.
    async fn create(&self, request: CreateUserRequest) -> Result<User, Error>;

    /// Fetch a user, failing with `NotFound` when absent.
    async fn find_by_id(&self, id: UserId) -> Result<User, Error>;

    /// Every registered user.
    async fn list_all(&self) -> Result<Vec<User>, Error>;

    /// Apply the supplied field changes to an existing user.
    async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<User, Error>;

    /// Delete an existing user, failing with `NotFound` when absent.
    async fn remove(&self, id: UserId) -> Result<(), Error>;
}
