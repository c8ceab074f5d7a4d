//! Domain primitives, entities, ports and services.
//!
//! Purpose: hold the registration rules independent of any framework. Inbound
//! and outbound adapters depend on this module; it depends on neither.
//!
//! Public surface:
//! - Email, NationalId — validating value types.
//! - User, UserId — the registered user entity and its identifier.
//! - Error, ErrorCode — transport-agnostic failure payload.
//! - UserRegistrationService — implementation of the registration port.
//! - ports — driving and driven port traits.

pub mod email;
pub mod error;
pub mod national_id;
pub mod ports;
pub mod trace_id;
pub mod user;
mod user_registration_service;

pub use self::email::{Email, EmailValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::national_id::{NATIONAL_ID_LENGTH, NationalId, NationalIdValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserId, UserValidationError};
pub use self::user_registration_service::UserRegistrationService;
