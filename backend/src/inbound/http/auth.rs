//! Bearer token authentication for HTTP handlers.
//!
//! Handlers take an [`AuthenticatedUser`] argument; extraction fails with
//! `401 unauthorized` before the handler body runs. The `Authorization`
//! header may carry `Bearer <token>` or the bare token.

use std::future::{Ready, ready};

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use tracing::debug;

use crate::domain::ports::TokenError;
use crate::domain::{Error, UserId};

use super::state::HttpState;

/// Identity of the caller, proven by a verified access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    /// Subject of the presented token.
    pub fn user_id(&self) -> &UserId {
        &self.0
    }
}

/// Pull the token out of an `Authorization` header value.
fn bearer_token(header: &str) -> Option<&str> {
    let header = header.trim();
    let token = match header.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        Some(_) => return None,
        None => header,
    };
    (!token.is_empty()).then_some(token)
}

fn map_token_error(err: TokenError) -> Error {
    debug!(error = %err, "access token rejected");
    match err {
        TokenError::Expired => Error::unauthorized("token has expired"),
        TokenError::Invalid { .. } => Error::unauthorized("invalid token"),
        TokenError::Encode { message } => Error::internal(message),
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))?;
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing authorization header"))?;
    let token = header
        .to_str()
        .ok()
        .and_then(bearer_token)
        .ok_or_else(|| Error::unauthorized("malformed authorization header"))?;
    state
        .tokens
        .verify(token)
        .map(AuthenticatedUser)
        .map_err(map_token_error)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::TokenService;
    use crate::inbound::http::test_utils::{TestContext, test_context};
    use actix_web::test::TestRequest;
    use rstest::rstest;
    use rstest_bdd_macros::{given, then, when};

    #[rstest]
    #[case("Bearer abc.def.ghi", Some("abc.def.ghi"))]
    #[case("bearer   abc.def.ghi  ", Some("abc.def.ghi"))]
    #[case("abc.def.ghi", Some("abc.def.ghi"))]
    #[case("Basic dXNlcjpwYXNz", None)]
    #[case("Bearer ", None)]
    #[case("", None)]
    fn bearer_token_accepts_prefixed_and_raw_tokens(
        #[case] header: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(bearer_token(header), expected);
    }

    #[given("a request carrying a freshly issued token")]
    fn a_request_with_a_token(context: &TestContext) -> (HttpRequest, UserId) {
        let user_id = UserId::random();
        let token = context.tokens.issue(&user_id).expect("issue token");
        let req = TestRequest::default()
            .app_data(context.data())
            .insert_header((AUTHORIZATION, format!("Bearer {}", token.token())))
            .to_http_request();
        (req, user_id)
    }

    #[given("a request without an authorization header")]
    fn a_request_without_a_token(context: &TestContext) -> HttpRequest {
        TestRequest::default()
            .app_data(context.data())
            .to_http_request()
    }

    #[when("the caller is authenticated")]
    fn the_caller_is_authenticated(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
        authenticate(req)
    }

    #[then("the token subject is returned")]
    fn the_token_subject_is_returned(result: Result<AuthenticatedUser, Error>, expected: UserId) {
        let user = result.expect("authentication succeeds");
        assert_eq!(user.user_id(), &expected);
    }

    #[then("an unauthorised error is returned")]
    fn an_unauthorised_error_is_returned(result: Result<AuthenticatedUser, Error>) {
        let error = result.expect_err("should be an error");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn authentication_happy_path(test_context: TestContext) {
        let (req, expected) = a_request_with_a_token(&test_context);
        let result = the_caller_is_authenticated(&req);
        the_token_subject_is_returned(result, expected);
    }

    #[rstest]
    fn authentication_unhappy_path(test_context: TestContext) {
        let req = a_request_without_a_token(&test_context);
        let result = the_caller_is_authenticated(&req);
        an_unauthorised_error_is_returned(result);
    }

    #[rstest]
    #[case("Bearer not-a-jwt")]
    #[case("Token abc")]
    fn invalid_tokens_are_unauthorised(test_context: TestContext, #[case] header: &str) {
        let req = TestRequest::default()
            .app_data(test_context.data())
            .insert_header((AUTHORIZATION, header))
            .to_http_request();
        an_unauthorised_error_is_returned(authenticate(&req));
    }

    #[rstest]
    fn missing_state_is_an_internal_error() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer abc"))
            .to_http_request();
        let err = authenticate(&req).expect_err("state is required");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
