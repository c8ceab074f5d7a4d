//! User registry library.
//!
//! Hexagonal layout: `domain` holds value types, the user entity, ports and
//! the registration service; `inbound` adapts HTTP onto the driving ports;
//! `outbound` provides PostgreSQL and in-memory storage for the driven port.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
pub use settings::ServerSettings;
