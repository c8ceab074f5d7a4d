//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on domain ports,
//! so tests can swap in mocks without any storage.

use std::sync::Arc;

use crate::domain::ports::{UserRegistration, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Commands and entity lookups routed through the registration service.
    pub registration: Arc<dyn UserRegistration>,
    /// Read-only projections served straight from storage.
    pub users: Arc<dyn UsersQuery>,
}

impl HttpState {
    /// Bundle the two ports.
    pub fn new(registration: Arc<dyn UserRegistration>, users: Arc<dyn UsersQuery>) -> Self {
        Self {
            registration,
            users,
        }
    }
}
