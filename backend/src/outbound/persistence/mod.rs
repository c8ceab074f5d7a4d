//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the user ports backed by PostgreSQL through
//! `diesel-async` and `bb8` pooling.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and domain
//!   types. No registration rules live here.
//! - **Internal models**: row structs (`models.rs`) and the table definition
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: database failures become [`UserPersistenceError`]
//!   on the write port and domain errors on the read port.
//!
//! [`UserPersistenceError`]: crate::domain::ports::UserPersistenceError
//!
//! # Example
//!
//! ```no_run
//! use user_registry::outbound::persistence::{
//!     DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
//! };
//!
//! # async fn connect() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://localhost/registry";
//! run_pending_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let repo = DieselUserRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_user_repository;
mod diesel_users_query;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use diesel_users_query::DieselUsersQuery;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
