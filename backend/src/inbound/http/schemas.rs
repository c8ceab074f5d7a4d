//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay free of `utoipa`; the wrappers here mirror their JSON
//! shape for documentation only.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_value")]
    InvalidValue,
    #[schema(rename = "missing_argument")]
    MissingArgument,
    #[schema(rename = "validation_failed")]
    ValidationFailed,
    #[schema(rename = "duplicate_conflict")]
    DuplicateConflict,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "duplicate_conflict")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "a user with this email already exists: ana@example.com")]
    message: String,
    /// Correlation identifier, also sent in the `Trace-Id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Structured context such as the offending field.
    details: Option<serde_json::Value>,
}
