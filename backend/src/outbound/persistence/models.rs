//! Internal Diesel row structs for the `users` table.
//!
//! These types never leave the persistence module. Rows are turned back into
//! domain users through the validating factories, so a row that no longer
//! satisfies the value rules surfaces as a query error rather than a panic.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::ports::{UserDetails, UserPersistenceError, UserSummary};
use crate::domain::{User, UserId};

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub national_id: Option<String>,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, UserPersistenceError> {
        let id = self.id;
        User::from_strings(
            Some(UserId::new(id)),
            self.name,
            &self.email,
            self.national_id.as_deref(),
        )
        .map_err(|err| UserPersistenceError::query(format!("stored user {id} is invalid: {err}")))
    }

    pub(crate) fn into_summary(self) -> UserSummary {
        UserSummary {
            id: UserId::new(self.id),
            name: self.name,
            email: self.email,
        }
    }

    pub(crate) fn into_details(self) -> UserDetails {
        UserDetails {
            id: UserId::new(self.id),
            name: self.name,
            email: self.email,
            national_id: self.national_id,
        }
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub national_id: Option<&'a str>,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            name: user.name(),
            email: user.email_as_str(),
            national_id: user.national_id_as_str(),
        }
    }
}

/// Changeset struct for updating existing user records.
///
/// `national_id` is written even when `None` so clearing it reaches storage.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserChangeset<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub national_id: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> UserChangeset<'a> {
    pub(crate) fn from_user(user: &'a User, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: user.name(),
            email: user.email_as_str(),
            national_id: user.national_id_as_str(),
            updated_at,
        }
    }
}
