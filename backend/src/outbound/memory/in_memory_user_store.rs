//! `RwLock`-guarded user store implementing both storage-facing ports.
//!
//! Identifiers are handed out sequentially from 1. Email uniqueness is not
//! enforced here; the registration service checks it before saving.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{
    UserDetails, UserPersistenceError, UserRepository, UserSummary, UsersQuery,
    normalise_email_lookup,
};
use crate::domain::{Error, User, UserId};

#[derive(Debug)]
struct StoreState {
    next_id: i64,
    users: BTreeMap<UserId, User>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            next_id: 1,
            users: BTreeMap::new(),
        }
    }
}

/// Volatile user storage shared behind an `Arc`.
///
/// # Examples
/// ```
/// use user_registry::domain::ports::UserRepository;
/// use user_registry::domain::{Email, User};
/// use user_registry::outbound::memory::InMemoryUserStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = InMemoryUserStore::new();
/// let email = Email::new("ana@example.com").unwrap();
/// let saved = store.save(&User::transient("Ana", email, None)).await.unwrap();
/// assert_eq!(saved.id().map(|id| id.get()), Some(1));
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    state: RwLock<StoreState>,
}

impl InMemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn find_by_normalised_email(&self, email: &str) -> Option<User> {
        self.state
            .read()
            .await
            .users
            .values()
            .find(|user| user.email_as_str() == email)
            .cloned()
    }
}

fn details_of(user: &User, id: UserId) -> UserDetails {
    UserDetails {
        id,
        name: user.name().to_owned(),
        email: user.email_as_str().to_owned(),
        national_id: user.national_id_as_str().map(str::to_owned),
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn save(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut state = self.state.write().await;
        let id = match user.id() {
            Some(id) => id,
            None => {
                let id = UserId::new(state.next_id);
                state.next_id += 1;
                id
            }
        };
        let stored = User::new(
            id,
            user.name(),
            user.email().clone(),
            user.national_id().cloned(),
        );
        state.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }

    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError> {
        self.state.write().await.users.remove(&id);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.find_by_normalised_email(email).await)
    }
}

#[async_trait]
impl UsersQuery for InMemoryUserStore {
    async fn list_users(&self) -> Result<Vec<UserSummary>, Error> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .map(|(id, user)| UserSummary {
                id: *id,
                name: user.name().to_owned(),
                email: user.email_as_str().to_owned(),
            })
            .collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserDetails>, Error> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).map(|user| details_of(user, id)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserDetails>, Error> {
        let user = self
            .find_by_normalised_email(&normalise_email_lookup(email))
            .await;
        debug!(found = user.is_some(), "email lookup on in-memory projection");
        Ok(user.and_then(|user| user.id().map(|id| details_of(&user, id))))
    }

    async fn count(&self) -> Result<u64, Error> {
        let len = self.state.read().await.users.len();
        u64::try_from(len).map_err(|err| Error::internal(format!("invalid user count: {err}")))
    }
}
