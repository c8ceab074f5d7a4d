//! User registration domain service.
//!
//! Implements the [`UserRegistration`] driving port on top of a
//! [`UserRepository`]. Email uniqueness is checked here, before each save;
//! concurrent registrations racing on the same address are settled by the
//! storage unique index, which surfaces as an internal error.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    CreateUserRequest, UpdateUserRequest, UserPersistenceError, UserRegistration, UserRepository,
};
use crate::domain::{Email, Error, User, UserId};

/// Registration service implementing the driving port.
#[derive(Clone)]
pub struct UserRegistrationService<R> {
    repository: Arc<R>,
}

impl<R> UserRegistrationService<R> {
    /// Create a new service over the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> UserRegistrationService<R>
where
    R: UserRepository,
{
    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
        }
    }

    fn missing(field: &'static str) -> Error {
        Error::missing_argument(format!("{field} null")).with_details(json!({ "field": field }))
    }

    fn not_found(id: UserId) -> Error {
        Error::not_found(format!("no user found with id: {id}")).with_details(json!({ "id": id }))
    }

    fn ensure_valid(user: &User) -> Result<(), Error> {
        if user.is_valid() {
            Ok(())
        } else {
            Err(Error::validation_failed("user data is invalid")
                .with_details(json!({ "field": "name", "code": "blank_name" })))
        }
    }

    /// Fail with `DuplicateConflict` when `email` belongs to a user other
    /// than `owner`.
    async fn ensure_email_available(&self, email: &Email, owner: Option<UserId>) -> Result<(), Error> {
        let existing = self
            .repository
            .find_by_email(email.as_str())
            .await
            .map_err(Self::map_persistence_error)?;

        match existing {
            Some(holder) if holder.id().is_none() || holder.id() != owner => {
                warn!(%email, holder_id = ?holder.id(), "email already registered");
                Err(
                    Error::duplicate_conflict(format!("a user with this email already exists: {email}"))
                        .with_details(json!({ "field": "email" })),
                )
            }
            _ => Ok(()),
        }
    }

    async fn persist(&self, user: &User) -> Result<User, Error> {
        self.repository
            .save(user)
            .await
            .map_err(Self::map_persistence_error)
    }
}

#[async_trait]
impl<R> UserRegistration for UserRegistrationService<R>
where
    R: UserRepository,
{
    async fn create(&self, request: CreateUserRequest) -> Result<User, Error> {
        let CreateUserRequest {
            name,
            email,
            national_id,
        } = request;
        let name = name.ok_or_else(|| Self::missing("name"))?;
        let email = email.ok_or_else(|| Self::missing("email"))?;
        let national_id = national_id.ok_or_else(|| Self::missing("nationalId"))?;

        let user = User::transient(name, email, Some(national_id));
        Self::ensure_valid(&user)?;
        self.ensure_email_available(user.email(), None).await?;

        let stored = self.persist(&user).await?;
        info!(user_id = ?stored.id(), "user registered");
        Ok(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, Error> {
        debug!(%id, "looking up user");
        self.repository
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Self::not_found(id))
    }

    async fn list_all(&self) -> Result<Vec<User>, Error> {
        self.repository
            .find_all()
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<User, Error> {
        let mut user = UserRegistration::find_by_id(self, id).await?;
        let UpdateUserRequest {
            name,
            email,
            national_id,
        } = request;

        if let Some(name) = name {
            user.rename(name)?;
        }
        let email_changed = match email {
            Some(email) if email != *user.email() => {
                user.reassign_email(email);
                true
            }
            _ => false,
        };
        if let Some(national_id) = national_id {
            user.reassign_national_id(national_id);
        }

        Self::ensure_valid(&user)?;
        if email_changed {
            self.ensure_email_available(user.email(), Some(id)).await?;
        }

        let stored = self.persist(&user).await?;
        info!(%id, email_changed, "user updated");
        Ok(stored)
    }

    async fn remove(&self, id: UserId) -> Result<(), Error> {
        UserRegistration::find_by_id(self, id).await?;
        self.repository
            .delete(id)
            .await
            .map_err(Self::map_persistence_error)?;
        info!(%id, "user removed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_registration_service_tests.rs"]
mod tests;
