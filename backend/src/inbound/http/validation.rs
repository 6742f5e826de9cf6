//! Mapping from domain validation failures to `422 validation_failed`.
//!
//! Details always carry `{ field, code }` so clients can highlight the
//! offending input.

use serde_json::json;

use crate::domain::{Error, LoginValidationError, UserValidationError};

fn field_error(field: &str, code: &str, message: String) -> Error {
    Error::validation(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    field_error(err.field(), err.code(), err.to_string())
}

pub(crate) fn login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => field_error("email", "empty_email", err.to_string()),
        LoginValidationError::EmptyPassword => {
            field_error("password", "empty_password", err.to_string())
        }
    }
}
