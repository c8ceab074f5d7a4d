//! Tests for the user entity.

use super::*;
use crate::domain::ErrorCode;
use rstest::{fixture, rstest};
use serde_json::json;

const VALID_NATIONAL_ID: &str = "123.456.789-09";

#[fixture]
fn email() -> Email {
    Email::new("ana@example.com").expect("valid email")
}

#[fixture]
fn national_id() -> NationalId {
    NationalId::new(VALID_NATIONAL_ID).expect("valid national id")
}

#[fixture]
fn stored_user(email: Email, national_id: NationalId) -> User {
    User::new(UserId::new(1), "Ana", email, Some(national_id))
}

#[rstest]
#[case("Ana", true)]
#[case("  Ana Silva ", true)]
#[case("", false)]
#[case("   ", false)]
fn validity_follows_name_content(email: Email, #[case] name: &str, #[case] expected: bool) {
    let user = User::transient(name, email, None);
    assert_eq!(user.is_valid(), expected);
}

#[rstest]
fn transient_users_are_not_persisted(email: Email) {
    let user = User::transient("Ana", email, None);
    assert!(!user.is_persisted());
    assert_eq!(user.id(), None);
}

#[rstest]
fn stored_users_expose_their_fields(stored_user: User) {
    assert!(stored_user.is_persisted());
    assert_eq!(stored_user.id(), Some(UserId::new(1)));
    assert_eq!(stored_user.name(), "Ana");
    assert_eq!(stored_user.email_as_str(), "ana@example.com");
    assert_eq!(stored_user.national_id_as_str(), Some("12345678909"));
    assert!(stored_user.has_national_id());
}

#[rstest]
fn rename_rejects_blank_names(mut stored_user: User) {
    assert_eq!(stored_user.rename("  "), Err(UserValidationError::BlankName));
    assert_eq!(stored_user.name(), "Ana");

    stored_user.rename("Ana Maria").expect("non-blank name");
    assert_eq!(stored_user.name(), "Ana Maria");
}

#[rstest]
fn reassigning_email_replaces_address(mut stored_user: User) {
    let replacement = Email::new("ana.maria@example.org").expect("valid email");
    stored_user.reassign_email(replacement.clone());
    assert_eq!(stored_user.email(), &replacement);
}

#[rstest]
fn reassigning_email_from_text_validates(mut stored_user: User) {
    let err = stored_user
        .reassign_email_from_str("broken")
        .expect_err("malformed email");
    assert_eq!(err.code(), ErrorCode::InvalidValue);
    assert_eq!(stored_user.email_as_str(), "ana@example.com");

    stored_user
        .reassign_email_from_str(" NEW@Example.org ")
        .expect("valid email");
    assert_eq!(stored_user.email_as_str(), "new@example.org");
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("   "))]
fn blank_national_id_text_clears_the_field(mut stored_user: User, #[case] raw: Option<&str>) {
    stored_user
        .reassign_national_id_from_str(raw)
        .expect("blank clears");
    assert!(!stored_user.has_national_id());
}

#[rstest]
fn invalid_national_id_text_is_rejected(mut stored_user: User) {
    let err = stored_user
        .reassign_national_id_from_str(Some("111.111.111-11"))
        .expect_err("repeated digits");
    assert_eq!(err.code(), ErrorCode::InvalidValue);
    assert_eq!(stored_user.national_id_as_str(), Some("12345678909"));
}

#[rstest]
fn from_strings_parses_every_field() {
    let user = User::from_strings(
        Some(UserId::new(9)),
        "Bruno",
        "Bruno@Example.com",
        Some("529.982.247-25"),
    )
    .expect("valid strings");
    assert_eq!(user.id(), Some(UserId::new(9)));
    assert_eq!(user.email_as_str(), "bruno@example.com");
    assert_eq!(user.national_id_as_str(), Some("52998224725"));
}

#[rstest]
#[case("not-an-email", None)]
#[case("bruno@example.com", Some("123"))]
fn from_strings_rejects_invalid_values(#[case] email: &str, #[case] national_id: Option<&str>) {
    let err = User::from_strings(None, "Bruno", email, national_id).expect_err("invalid input");
    assert_eq!(err.code(), ErrorCode::InvalidValue);
}

#[rstest]
fn persisted_users_compare_by_id(stored_user: User) {
    let other = User::new(
        UserId::new(1),
        "Someone Else",
        Email::new("else@example.com").expect("valid email"),
        None,
    );
    assert_eq!(stored_user, other);

    let different = User::new(
        UserId::new(2),
        stored_user.name(),
        stored_user.email().clone(),
        stored_user.national_id().cloned(),
    );
    assert_ne!(stored_user, different);
}

#[rstest]
fn transient_users_compare_by_value(email: Email, national_id: NationalId) {
    let left = User::transient("Ana", email.clone(), Some(national_id.clone()));
    let right = User::transient("Ana", email.clone(), Some(national_id));
    assert_eq!(left, right);

    let renamed = User::transient("Bia", email, None);
    assert_ne!(left, renamed);
}

#[rstest]
fn serialises_with_camel_case_fields(stored_user: User) {
    let value = serde_json::to_value(&stored_user).expect("serialise user");
    assert_eq!(
        value,
        json!({
            "id": 1,
            "name": "Ana",
            "email": "ana@example.com",
            "nationalId": "12345678909",
        })
    );
}
