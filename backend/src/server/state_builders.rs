//! Builders wiring storage adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;

use user_registry::domain::UserRegistrationService;
use user_registry::domain::ports::{UserRegistration, UserRepository, UsersQuery};
use user_registry::inbound::http::state::HttpState;
use user_registry::outbound::memory::InMemoryUserStore;
use user_registry::outbound::persistence::{DbPool, DieselUserRepository, DieselUsersQuery};

use super::ServerConfig;

/// Pair a registration service over `repository` with a query adapter.
fn state_over<R>(repository: Arc<R>, users: Arc<dyn UsersQuery>) -> HttpState
where
    R: UserRepository + 'static,
{
    let registration: Arc<dyn UserRegistration> =
        Arc::new(UserRegistrationService::new(repository));
    HttpState::new(registration, users)
}

fn diesel_state(pool: &DbPool) -> HttpState {
    state_over(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselUsersQuery::new(pool.clone())),
    )
}

/// Both ports read the same store so writes are visible to queries.
pub(crate) fn memory_state(store: Arc<InMemoryUserStore>) -> HttpState {
    let users: Arc<dyn UsersQuery> = store.clone();
    state_over(store, users)
}

/// Build HTTP state backed by PostgreSQL when a pool is configured,
/// otherwise by a fresh in-memory store.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => diesel_state(pool),
        None => memory_state(Arc::new(InMemoryUserStore::new())),
    };
    web::Data::new(state)
}
