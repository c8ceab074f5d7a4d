//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses, CLI exit reports, or any other protocol-specific envelope.

use serde::Serialize;
use serde_json::Value;

use super::trace_id::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A supplied value failed its own validation rules.
    InvalidValue,
    /// A required input was absent.
    MissingArgument,
    /// A whole entity failed its validity check.
    ValidationFailed,
    /// Another user already holds the requested email address.
    DuplicateConflict,
    /// The requested user does not exist.
    NotFound,
    /// A dependency such as the database is unreachable.
    ServiceUnavailable,
    /// An unexpected failure inside the registry.
    InternalError,
}

impl ErrorCode {
    const fn default_message(self) -> &'static str {
        match self {
            Self::InvalidValue => "invalid value",
            Self::MissingArgument => "missing argument",
            Self::ValidationFailed => "validation failed",
            Self::DuplicateConflict => "duplicate entry",
            Self::NotFound => "not found",
            Self::ServiceUnavailable => "service unavailable",
            Self::InternalError => "internal error",
        }
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
/// - `trace_id`, when present, is non-empty.
///
/// # Examples
/// ```
/// use user_registry::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("no user found with id: 7");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error.
    ///
    /// A blank message is replaced with a generic description of `code`.
    /// The trace identifier in scope, if any, is captured.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.default_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier captured when the error was built.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary error details for adapters.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use user_registry::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_value("bad").with_details(json!({ "field": "email" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Override the captured trace identifier.
    ///
    /// A blank identifier leaves the error unchanged.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        let trace_id = trace_id.into();
        if !trace_id.trim().is_empty() {
            self.trace_id = Some(trace_id);
        }
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidValue`].
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidValue, message)
    }

    /// Convenience constructor for [`ErrorCode::MissingArgument`].
    pub fn missing_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingArgument, message)
    }

    /// Convenience constructor for [`ErrorCode::ValidationFailed`].
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Convenience constructor for [`ErrorCode::DuplicateConflict`].
    pub fn duplicate_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicateConflict, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
