//! Driven port for user storage adapters and their errors.
//!
//! The registration service is the only caller. Adapters translate between
//! their storage representation and [`User`]; they enforce no business rules.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Storage could not be reached.
        Connection { message: String } => "user repository connection failed: {message}",
        /// A query or mutation failed, including constraint violations.
        Query { message: String } => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user without an identifier, or update the stored row for a
    /// user with one. Returns the stored form, with the identifier assigned.
    async fn save(&self, user: &User) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Every stored user, ordered by identifier.
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Remove a user. Removing an unknown identifier is not an error.
    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError>;

    /// Fetch a user by normalised email text.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError>;
}
