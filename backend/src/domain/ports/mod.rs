//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod user_registration;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use user_registration::MockUserRegistration;
pub use user_registration::{CreateUserRequest, UpdateUserRequest, UserRegistration};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::{UserDetails, UserSummary, UsersQuery, normalise_email_lookup};
