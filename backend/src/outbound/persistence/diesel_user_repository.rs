//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn save(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = match user.id() {
            None => {
                let new_row = NewUserRow::from(user);
                diesel::insert_into(users::table)
                    .values(&new_row)
                    .returning(UserRow::as_returning())
                    .get_result(&mut conn)
                    .await
            }
            Some(id) => {
                let changeset = UserChangeset::from_user(user, Utc::now());
                diesel::update(users::table.find(id.get()))
                    .set(&changeset)
                    .returning(UserRow::as_returning())
                    .get_result(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;

        debug!(user_id = row.id, "user row written");
        row.into_user()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(%id, deleted, "user rows deleted");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(UserRow::into_user).transpose()
    }
}
