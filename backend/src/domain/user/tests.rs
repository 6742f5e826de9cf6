//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};
use serde_json::Value;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn stored_user() -> User {
    User::register(
        UserId::new(VALID_ID).expect("fixture id"),
        EmailAddress::new("default@email.com").expect("fixture email"),
        PasswordHash::new("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"),
    )
}

#[rstest]
#[case(VALID_ID, true)]
#[case("not-a-uuid", false)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", false)]
#[case("", false)]
#[case("5ae7099c8f3d79034a709c0c", false)]
fn user_id_parsing(#[case] raw: &str, #[case] valid: bool) {
    assert_eq!(UserId::new(raw).is_ok(), valid);
}

#[rstest]
#[case("default@email.com", "default@email.com")]
#[case("  NewUser@Gmail.com ", "newuser@gmail.com")]
fn email_normalises(#[case] raw: &str, #[case] expected: &str) {
    let email = EmailAddress::new(raw).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("   ", UserValidationError::EmptyEmail)]
#[case("no-at-sign", UserValidationError::InvalidEmail)]
#[case("two@@example.com", UserValidationError::InvalidEmail)]
#[case("user@localhost", UserValidationError::InvalidEmail)]
#[case("spaced out@example.com", UserValidationError::InvalidEmail)]
fn email_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    let err = EmailAddress::new(raw).expect_err("invalid email must fail");
    assert_eq!(err, expected);
    assert_eq!(err.field(), "email");
}

#[rstest]
fn email_rejects_overlong_input() {
    let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX));
    let err = EmailAddress::new(raw).expect_err("overlong email must fail");
    assert_eq!(err, UserValidationError::EmailTooLong { max: EMAIL_MAX });
}

#[rstest]
#[case("", UserValidationError::EmptyPassword)]
#[case("12345", UserValidationError::PasswordTooShort { min: PASSWORD_MIN })]
fn password_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    let err = Password::new(raw).expect_err("invalid password must fail");
    assert_eq!(err, expected);
    assert_eq!(err.field(), "password");
}

#[rstest]
fn password_rejects_overlong_input() {
    let err = Password::new("x".repeat(PASSWORD_MAX + 1)).expect_err("overlong password");
    assert_eq!(err, UserValidationError::PasswordTooLong { max: PASSWORD_MAX });
}

#[rstest]
fn password_debug_is_redacted() {
    let password = Password::new("123456").expect("valid password");
    assert!(!format!("{password:?}").contains("123456"));
    assert_eq!(password.expose(), "123456");
}

#[rstest]
fn user_serialises_without_password_hash(stored_user: User) {
    let value = serde_json::to_value(&stored_user).expect("serialise user");
    assert_eq!(value.get("id").and_then(Value::as_str), Some(VALID_ID));
    assert_eq!(
        value.get("email").and_then(Value::as_str),
        Some("default@email.com")
    );
    assert!(value.get("createdAt").is_some());
    assert!(value.get("updatedAt").is_some());
    assert!(value.get("passwordHash").is_none());
    assert!(value.get("password_hash").is_none());
    assert!(!value.to_string().contains("argon2"));
}

#[rstest]
fn with_changes_keeps_identity_and_creation_time(stored_user: User) {
    let new_email = EmailAddress::new("updated_user@gmail.com").expect("valid email");
    let updated = stored_user.with_changes(Some(new_email.clone()), None);

    assert_eq!(updated.id(), stored_user.id());
    assert_eq!(updated.created_at(), stored_user.created_at());
    assert_eq!(updated.email(), &new_email);
    assert_eq!(updated.password_hash(), stored_user.password_hash());
    assert!(updated.updated_at() >= stored_user.updated_at());
}

#[rstest]
fn new_user_validates_both_fields() {
    let err = NewUser::try_from_parts("newuser@gmail.com", "").expect_err("missing password");
    assert_eq!(err, UserValidationError::EmptyPassword);

    let user = NewUser::try_from_parts("NewUser@gmail.com", "3334455").expect("valid input");
    assert_eq!(user.email().as_ref(), "newuser@gmail.com");
    assert_eq!(user.password().expose(), "3334455");
}

#[rstest]
#[case(None, None, true)]
#[case(Some("updated_user@gmail.com"), None, false)]
#[case(None, Some("32134543"), false)]
fn user_changes_reports_emptiness(
    #[case] email: Option<&str>,
    #[case] password: Option<&str>,
    #[case] empty: bool,
) {
    let changes = UserChanges::try_from_parts(email, password).expect("valid changes");
    assert_eq!(changes.is_empty(), empty);
}

#[rstest]
fn user_changes_rejects_invalid_present_fields() {
    let err = UserChanges::try_from_parts(Some("nope"), None).expect_err("invalid email");
    assert_eq!(err.code(), "invalid_email");
}
