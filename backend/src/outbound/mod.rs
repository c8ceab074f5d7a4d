//! Outbound adapters implementing domain ports for storage.
//!
//! - **persistence**: PostgreSQL-backed adapters using Diesel ORM.
//! - **memory**: process-local store for development and tests.
//!
//! Adapters translate between domain types and storage representations and
//! contain no registration rules.

pub mod memory;
pub mod persistence;
