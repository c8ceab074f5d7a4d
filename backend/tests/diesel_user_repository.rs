//! Integration tests for the Diesel adapters against a live PostgreSQL.
//!
//! Set `REGISTRY_TEST_DATABASE_URL` to run them; each test skips otherwise.
//! Email addresses carry a random suffix so runs do not collide on the
//! unique index.
//!
//! # Runtime Strategy
//!
//! Tests are synchronous and reuse one Tokio runtime per test context, so
//! database operations stay deterministic.

use std::env;

use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use user_registry::domain::ports::{UserPersistenceError, UserRepository, UsersQuery};
use user_registry::domain::{Email, NationalId, User, UserId};
use user_registry::outbound::persistence::{
    DbPool, DieselUserRepository, DieselUsersQuery, PoolConfig, run_pending_migrations,
};
use uuid::Uuid;

const DATABASE_URL_VAR: &str = "REGISTRY_TEST_DATABASE_URL";

// -----------------------------------------------------------------------------
// Test Context
// -----------------------------------------------------------------------------

struct TestContext {
    runtime: Runtime,
    repository: DieselUserRepository,
    query: DieselUsersQuery,
}

fn setup_test_context() -> Result<Option<TestContext>, String> {
    let Ok(database_url) = env::var(DATABASE_URL_VAR) else {
        return Ok(None);
    };
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    runtime
        .block_on(run_pending_migrations(&database_url))
        .map_err(|err| err.to_string())?;

    let config = PoolConfig::new(&database_url).with_max_size(2);
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(Some(TestContext {
        runtime,
        repository: DieselUserRepository::new(pool.clone()),
        query: DieselUsersQuery::new(pool),
    }))
}

#[fixture]
fn diesel_context() -> Option<TestContext> {
    setup_test_context().unwrap_or_else(|reason| panic!("database setup failed: {reason}"))
}

fn unique_email(local: &str) -> Email {
    Email::new(format!("{local}.{}@example.com", Uuid::new_v4().simple()))
        .expect("generated email is valid")
}

fn transient(name: &str, email: Email) -> User {
    User::transient(
        name,
        email,
        Some(NationalId::new("123.456.789-09").expect("valid national id")),
    )
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[rstest]
fn save_assigns_an_identifier_and_round_trips(diesel_context: Option<TestContext>) {
    let Some(ctx) = diesel_context else {
        eprintln!("SKIP-TEST-DATABASE: save_assigns_an_identifier_and_round_trips skipped");
        return;
    };

    let email = unique_email("ana");
    let saved = ctx
        .runtime
        .block_on(ctx.repository.save(&transient("Ana Souza", email.clone())))
        .expect("insert succeeds");
    let id = saved.id().expect("database assigns an id");

    let fetched = ctx
        .runtime
        .block_on(UserRepository::find_by_id(&ctx.repository, id))
        .expect("lookup succeeds")
        .expect("user exists");
    assert_eq!(fetched.email(), &email);
    assert_eq!(fetched.national_id_as_str(), Some("12345678909"));

    let by_email = ctx
        .runtime
        .block_on(UserRepository::find_by_email(&ctx.repository, email.as_str()))
        .expect("lookup succeeds");
    assert_eq!(by_email.and_then(|user| user.id()), Some(id));
}

#[rstest]
fn save_with_identifier_updates_and_clears_national_id(diesel_context: Option<TestContext>) {
    let Some(ctx) = diesel_context else {
        eprintln!("SKIP-TEST-DATABASE: save_with_identifier_updates_and_clears_national_id skipped");
        return;
    };

    let mut user = ctx
        .runtime
        .block_on(ctx.repository.save(&transient("Bia", unique_email("bia"))))
        .expect("insert succeeds");
    user.rename("Bia Souza").expect("non-blank name");
    user.reassign_national_id(None);

    let updated = ctx
        .runtime
        .block_on(ctx.repository.save(&user))
        .expect("update succeeds");
    assert_eq!(updated.id(), user.id());
    assert_eq!(updated.name(), "Bia Souza");
    assert!(!updated.has_national_id());
}

#[rstest]
fn duplicate_email_is_a_query_error(diesel_context: Option<TestContext>) {
    let Some(ctx) = diesel_context else {
        eprintln!("SKIP-TEST-DATABASE: duplicate_email_is_a_query_error skipped");
        return;
    };

    let email = unique_email("caio");
    ctx.runtime
        .block_on(ctx.repository.save(&transient("Caio", email.clone())))
        .expect("first insert succeeds");
    let err = ctx
        .runtime
        .block_on(ctx.repository.save(&transient("Other", email)))
        .expect_err("unique index rejects duplicate");
    assert!(matches!(err, UserPersistenceError::Query { .. }), "got {err:?}");
}

#[rstest]
fn delete_removes_the_row(diesel_context: Option<TestContext>) {
    let Some(ctx) = diesel_context else {
        eprintln!("SKIP-TEST-DATABASE: delete_removes_the_row skipped");
        return;
    };

    let saved = ctx
        .runtime
        .block_on(ctx.repository.save(&transient("Duda", unique_email("duda"))))
        .expect("insert succeeds");
    let id = saved.id().expect("database assigns an id");

    ctx.runtime
        .block_on(ctx.repository.delete(id))
        .expect("delete succeeds");
    let fetched = ctx
        .runtime
        .block_on(UserRepository::find_by_id(&ctx.repository, id))
        .expect("lookup succeeds");
    assert!(fetched.is_none());
}

#[rstest]
fn query_adapter_normalises_email_and_formats_details(diesel_context: Option<TestContext>) {
    let Some(ctx) = diesel_context else {
        eprintln!("SKIP-TEST-DATABASE: query_adapter_normalises_email_and_formats_details skipped");
        return;
    };

    let email = unique_email("edu");
    let saved = ctx
        .runtime
        .block_on(ctx.repository.save(&transient("Edu", email.clone())))
        .expect("insert succeeds");

    let shouted = format!("  {}  ", email.as_str().to_uppercase());
    let details = ctx
        .runtime
        .block_on(UsersQuery::find_by_email(&ctx.query, &shouted))
        .expect("lookup succeeds")
        .expect("user exists");
    assert_eq!(Some(details.id), saved.id());
    assert_eq!(
        details.national_id_formatted().as_deref(),
        Some("123.456.789-09")
    );

    let count = ctx
        .runtime
        .block_on(ctx.query.count())
        .expect("count succeeds");
    assert!(count >= 1);
}

#[rstest]
fn unknown_identifier_returns_none(diesel_context: Option<TestContext>) {
    let Some(ctx) = diesel_context else {
        eprintln!("SKIP-TEST-DATABASE: unknown_identifier_returns_none skipped");
        return;
    };

    let fetched = ctx
        .runtime
        .block_on(UsersQuery::find_by_id(&ctx.query, UserId::new(i64::MAX)))
        .expect("lookup succeeds");
    assert!(fetched.is_none());
}
