//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly; `diesel print-schema` against a
//! migrated database regenerates it.

diesel::table! {
    /// Registered users.
    users (id) {
        /// Primary key assigned by the `BIGSERIAL` sequence.
        id -> Int8,
        name -> Varchar,
        /// Normalised email address; unique across the table.
        email -> Varchar,
        /// Eleven CPF digits without punctuation.
        national_id -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
