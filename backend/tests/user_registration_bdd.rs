//! Behaviour tests for user registration over the in-memory store.
//!
//! Steps are synchronous and drive the async service through a runtime held
//! by the world.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use tokio::runtime::Runtime;
use user_registry::domain::ports::{
    CreateUserRequest, UpdateUserRequest, UserRegistration, UsersQuery,
};
use user_registry::domain::{Email, Error, NationalId, User, UserId, UserRegistrationService};
use user_registry::outbound::memory::InMemoryUserStore;

const DEFAULT_NATIONAL_ID: &str = "111.444.777-35";

struct RegistryWorld {
    runtime: Runtime,
    store: Arc<InMemoryUserStore>,
    service: UserRegistrationService<InMemoryUserStore>,
    last_outcome: Option<Result<Option<User>, Error>>,
}

impl RegistryWorld {
    fn new() -> Self {
        let store = Arc::new(InMemoryUserStore::new());
        Self {
            runtime: Runtime::new().expect("tokio runtime"),
            service: UserRegistrationService::new(store.clone()),
            store,
            last_outcome: None,
        }
    }

    fn register(&self, request: CreateUserRequest) -> Result<User, Error> {
        self.runtime.block_on(self.service.create(request))
    }

    fn outcome(&self) -> Result<Option<User>, Error> {
        self.last_outcome
            .clone()
            .expect("a when step should have run")
    }
}

fn request(name: &str, email: &str, national_id: Option<&str>) -> CreateUserRequest {
    CreateUserRequest {
        name: Some(name.to_owned()),
        email: Some(Email::new(email).expect("valid email")),
        national_id: national_id.map(|raw| NationalId::new(raw).expect("valid national id")),
    }
}

#[fixture]
fn world() -> RegistryWorld {
    RegistryWorld::new()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("an empty user registry")]
fn an_empty_user_registry(world: &mut RegistryWorld) {
    *world = RegistryWorld::new();
}

#[given("{name} is registered with email {email}")]
fn a_user_is_registered(world: &mut RegistryWorld, name: String, email: String) {
    world
        .register(request(&name, &email, Some(DEFAULT_NATIONAL_ID)))
        .expect("background registration succeeds");
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("{name} registers with email {email} and national id {national_id}")]
fn a_user_registers(world: &mut RegistryWorld, name: String, email: String, national_id: String) {
    let outcome = world.register(request(&name, &email, Some(&national_id)));
    world.last_outcome = Some(outcome.map(Some));
}

#[when("{name} registers with email {email} and no national id")]
fn a_user_registers_without_national_id(world: &mut RegistryWorld, name: String, email: String) {
    let outcome = world.register(request(&name, &email, None));
    world.last_outcome = Some(outcome.map(Some));
}

#[when("user {id} changes email to {email}")]
fn a_user_changes_email(world: &mut RegistryWorld, id: i64, email: String) {
    let update = UpdateUserRequest {
        email: Some(Email::new(&email).expect("valid email")),
        ..UpdateUserRequest::default()
    };
    let outcome = world
        .runtime
        .block_on(world.service.update(UserId::new(id), update));
    world.last_outcome = Some(outcome.map(Some));
}

#[when("user {id} is removed")]
fn a_user_is_removed(world: &mut RegistryWorld, id: i64) {
    let outcome = world.runtime.block_on(world.service.remove(UserId::new(id)));
    world.last_outcome = Some(outcome.map(|()| None));
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the registration succeeds with id {id}")]
fn the_registration_succeeds(world: &mut RegistryWorld, id: i64) {
    let user = world
        .outcome()
        .expect("registration succeeds")
        .expect("a user is returned");
    assert_eq!(user.id(), Some(UserId::new(id)));
}

#[then("the stored email is {email}")]
fn the_stored_email_is(world: &mut RegistryWorld, email: String) {
    let user = world
        .outcome()
        .expect("registration succeeds")
        .expect("a user is returned");
    assert_eq!(user.email_as_str(), email);
}

#[then("the operation succeeds")]
fn the_operation_succeeds(world: &mut RegistryWorld) {
    if let Err(err) = world.outcome() {
        panic!("expected success, got {err}");
    }
}

#[then("the operation fails with code {code}")]
fn the_operation_fails_with_code(world: &mut RegistryWorld, code: String) {
    let err = world.outcome().expect_err("operation should fail");
    assert_eq!(
        serde_json::to_value(err.code()).expect("code serialises"),
        Value::String(code)
    );
}

#[then("the registry holds {count} users")]
fn the_registry_holds(world: &mut RegistryWorld, count: u64) {
    let actual = world
        .runtime
        .block_on(world.store.count())
        .expect("count succeeds");
    assert_eq!(actual, count);
}

// -----------------------------------------------------------------------------
// Scenarios
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/user_registration.feature",
    name = "Registering a new user"
)]
fn registering_a_new_user(world: RegistryWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_registration.feature",
    name = "Registering with an email already in use"
)]
fn registering_with_an_email_already_in_use(world: RegistryWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_registration.feature",
    name = "Registering without a national id"
)]
fn registering_without_a_national_id(world: RegistryWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_registration.feature",
    name = "Moving a user onto another user's email"
)]
fn moving_a_user_onto_another_users_email(world: RegistryWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_registration.feature",
    name = "Removing an unknown user"
)]
fn removing_an_unknown_user(world: RegistryWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_registration.feature",
    name = "Removing a registered user"
)]
fn removing_a_registered_user(world: RegistryWorld) {
    drop(world);
}
