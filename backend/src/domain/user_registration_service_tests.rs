//! Tests for the user registration service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockUserRepository;
use crate::domain::{ErrorCode, NationalId};
use crate::outbound::memory::InMemoryUserStore;

fn make_service(repo: MockUserRepository) -> UserRegistrationService<MockUserRepository> {
    UserRegistrationService::new(Arc::new(repo))
}

fn email(raw: &str) -> Email {
    Email::new(raw).expect("valid email")
}

#[fixture]
fn national_id() -> NationalId {
    NationalId::new("123.456.789-09").expect("valid national id")
}

fn stored(id: i64, name: &str, address: &str) -> User {
    User::new(UserId::new(id), name, email(address), None)
}

#[rstest]
#[tokio::test]
async fn create_persists_new_user(national_id: NationalId) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .with(eq("ana@example.com"))
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_save().times(1).returning(|user| {
        Ok(User::new(
            UserId::new(1),
            user.name(),
            user.email().clone(),
            user.national_id().cloned(),
        ))
    });

    let service = make_service(repo);
    let request = CreateUserRequest::new("Ana", email("Ana@Example.com"), national_id);
    let user = service.create(request).await.expect("create succeeds");

    assert_eq!(user.id(), Some(UserId::new(1)));
    assert_eq!(user.email_as_str(), "ana@example.com");
    assert_eq!(user.national_id_as_str(), Some("12345678909"));
}

#[rstest]
#[case::name(CreateUserRequest { name: None, ..CreateUserRequest::default() }, "name null")]
#[case::email(
    CreateUserRequest { name: Some("Ana".to_owned()), ..CreateUserRequest::default() },
    "email null"
)]
#[case::national_id(
    CreateUserRequest {
        name: Some("Ana".to_owned()),
        email: Some(email("ana@example.com")),
        national_id: None,
    },
    "nationalId null"
)]
#[tokio::test]
async fn create_reports_missing_arguments_without_touching_storage(
    #[case] request: CreateUserRequest,
    #[case] message: &str,
) {
    let service = make_service(MockUserRepository::new());
    let err = service.create(request).await.expect_err("missing argument");
    assert_eq!(err.code(), ErrorCode::MissingArgument);
    assert_eq!(err.message(), message);
}

#[rstest]
#[tokio::test]
async fn create_rejects_blank_name_without_touching_storage(national_id: NationalId) {
    let service = make_service(MockUserRepository::new());
    let request = CreateUserRequest::new("   ", email("ana@example.com"), national_id);

    let err = service.create(request).await.expect_err("invalid user");
    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    assert_eq!(err.message(), "user data is invalid");
}

#[rstest]
#[tokio::test]
async fn create_rejects_duplicate_email(national_id: NationalId) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .times(1)
        .return_once(|_| Ok(Some(stored(4, "Other", "ana@example.com"))));
    repo.expect_save().never();

    let service = make_service(repo);
    let request = CreateUserRequest::new("Ana", email("ana@example.com"), national_id);
    let err = service.create(request).await.expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::DuplicateConflict);
    assert_eq!(
        err.message(),
        "a user with this email already exists: ana@example.com"
    );
}

#[rstest]
#[case(UserPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(UserPersistenceError::query("unique violation"), ErrorCode::InternalError)]
#[tokio::test]
async fn create_maps_storage_failures(
    national_id: NationalId,
    #[case] failure: UserPersistenceError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().return_once(|_| Ok(None));
    repo.expect_save().return_once(move |_| Err(failure));

    let service = make_service(repo);
    let request = CreateUserRequest::new("Ana", email("ana@example.com"), national_id);
    let err = service.create(request).await.expect_err("storage failure");
    assert_eq!(err.code(), expected);
}

#[tokio::test]
async fn find_by_id_returns_stored_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .with(eq(UserId::new(3)))
        .return_once(|_| Ok(Some(stored(3, "Bia", "bia@example.com"))));

    let user = make_service(repo)
        .find_by_id(UserId::new(3))
        .await
        .expect("user exists");
    assert_eq!(user.name(), "Bia");
}

#[rstest]
#[case("Ana Souza", "ana@example.com", "123.456.789-09")]
#[case("Bia Lima", " Bia.Lima@Example.COM ", "52998224725")]
#[case("Caio Reis", "caio+news@mail.example.org", "111.444.777-35")]
#[tokio::test]
async fn created_user_is_found_by_its_identifier(
    #[case] name: &str,
    #[case] address: &str,
    #[case] raw_national_id: &str,
) {
    let store = Arc::new(InMemoryUserStore::new());
    let service = UserRegistrationService::new(Arc::clone(&store));
    let national_id = NationalId::new(raw_national_id).expect("valid national id");
    let request = CreateUserRequest::new(name, email(address), national_id.clone());

    let created = service.create(request).await.expect("create succeeds");
    let id = created.id().expect("stored user has an id");
    let found = service.find_by_id(id).await.expect("user exists");

    assert_eq!(found.name(), name);
    assert_eq!(found.email(), created.email());
    assert_eq!(found.email_as_str(), address.trim().to_lowercase());
    assert_eq!(found.national_id(), Some(&national_id));
}

#[tokio::test]
async fn find_by_id_reports_missing_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));

    let err = make_service(repo)
        .find_by_id(UserId::new(99))
        .await
        .expect_err("missing user");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "no user found with id: 99");
}

#[tokio::test]
async fn list_all_returns_every_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_all().return_once(|| {
        Ok(vec![
            stored(1, "Ana", "ana@example.com"),
            stored(2, "Bia", "bia@example.com"),
        ])
    });

    let users = make_service(repo).list_all().await.expect("list succeeds");
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn remove_deletes_existing_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(stored(5, "Caio", "caio@example.com"))));
    repo.expect_delete()
        .with(eq(UserId::new(5)))
        .times(1)
        .return_once(|_| Ok(()));

    make_service(repo)
        .remove(UserId::new(5))
        .await
        .expect("remove succeeds");
}

#[tokio::test]
async fn remove_reports_missing_user_without_deleting() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));
    repo.expect_delete().never();

    let err = make_service(repo)
        .remove(UserId::new(5))
        .await
        .expect_err("missing user");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn update_applies_changes_and_checks_new_email() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(stored(2, "Bia", "bia@example.com"))));
    repo.expect_find_by_email()
        .with(eq("bia.souza@example.com"))
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_save()
        .times(1)
        .returning(|user| Ok(user.clone()));

    let request = UpdateUserRequest {
        name: Some("Bia Souza".to_owned()),
        email: Some(email("bia.souza@example.com")),
        national_id: Some(Some(
            NationalId::new("529.982.247-25").expect("valid national id"),
        )),
    };
    let user = make_service(repo)
        .update(UserId::new(2), request)
        .await
        .expect("update succeeds");

    assert_eq!(user.name(), "Bia Souza");
    assert_eq!(user.email_as_str(), "bia.souza@example.com");
    assert_eq!(user.national_id_as_str(), Some("52998224725"));
}

#[tokio::test]
async fn update_keeping_email_skips_duplicate_check() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(stored(2, "Bia", "bia@example.com"))));
    repo.expect_find_by_email().never();
    repo.expect_save().returning(|user| Ok(user.clone()));

    let request = UpdateUserRequest {
        email: Some(email("BIA@example.com")),
        national_id: Some(None),
        ..UpdateUserRequest::default()
    };
    let user = make_service(repo)
        .update(UserId::new(2), request)
        .await
        .expect("update succeeds");
    assert!(!user.has_national_id());
}

#[tokio::test]
async fn update_rejects_email_held_by_another_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(stored(2, "Bia", "bia@example.com"))));
    repo.expect_find_by_email()
        .return_once(|_| Ok(Some(stored(7, "Ana", "ana@example.com"))));
    repo.expect_save().never();

    let request = UpdateUserRequest {
        email: Some(email("ana@example.com")),
        ..UpdateUserRequest::default()
    };
    let err = make_service(repo)
        .update(UserId::new(2), request)
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::DuplicateConflict);
}

#[tokio::test]
async fn update_rejects_blank_name() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(stored(2, "Bia", "bia@example.com"))));
    repo.expect_save().never();

    let request = UpdateUserRequest {
        name: Some(" ".to_owned()),
        ..UpdateUserRequest::default()
    };
    let err = make_service(repo)
        .update(UserId::new(2), request)
        .await
        .expect_err("blank name");
    assert_eq!(err.code(), ErrorCode::ValidationFailed);
}

#[tokio::test]
async fn update_reports_missing_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));

    let err = make_service(repo)
        .update(UserId::new(42), UpdateUserRequest::default())
        .await
        .expect_err("missing user");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
