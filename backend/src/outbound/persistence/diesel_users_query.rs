//! Diesel-backed `UsersQuery` adapter.
//!
//! Serves read projections straight from the `users` table without loading
//! domain entities, so rows are returned as stored.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserDetails, UserSummary, UsersQuery, normalise_email_lookup};
use crate::domain::{Error, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, map_user_persistence_error};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Read-side adapter over the users table.
#[derive(Clone)]
pub struct DieselUsersQuery {
    pool: DbPool,
}

impl DieselUsersQuery {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_failure(error: PoolError) -> Error {
    map_user_persistence_error(map_pool_error(error))
}

fn query_failure(error: diesel::result::Error) -> Error {
    map_user_persistence_error(map_diesel_error(error))
}

#[async_trait]
impl UsersQuery for DieselUsersQuery {
    async fn list_users(&self) -> Result<Vec<UserSummary>, Error> {
        let mut conn = self.pool.get().await.map_err(pool_failure)?;

        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_failure)?;

        debug!(rows = rows.len(), "listed users from read projection");
        Ok(rows.into_iter().map(UserRow::into_summary).collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserDetails>, Error> {
        let mut conn = self.pool.get().await.map_err(pool_failure)?;

        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_failure)?;

        Ok(row.map(UserRow::into_details))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserDetails>, Error> {
        let mut conn = self.pool.get().await.map_err(pool_failure)?;
        let email = normalise_email_lookup(email);

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(&email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_failure)?;

        debug!(found = row.is_some(), "email lookup on read projection");
        Ok(row.map(UserRow::into_details))
    }

    async fn count(&self) -> Result<u64, Error> {
        let mut conn = self.pool.get().await.map_err(pool_failure)?;

        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_failure)?;

        u64::try_from(total).map_err(|err| Error::internal(format!("invalid user count: {err}")))
    }
}
