//! Mapping from pool and Diesel failures to [`UserPersistenceError`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::Error;
use crate::domain::ports::UserPersistenceError;

use super::pool::PoolError;

pub(super) fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

pub(super) fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::query("email already stored")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

/// Read-path mapping: connection problems are retryable, the rest are internal.
pub(super) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
    }
}
