//! In-process storage adapters.
//!
//! Used when no database URL is configured and by behaviour tests.

mod in_memory_user_store;

pub use in_memory_user_store::InMemoryUserStore;
