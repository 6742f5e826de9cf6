//! End-to-end coverage of the assembled users API.
//!
//! Drives the same `App` the binary serves (trace and CORS middleware, JSON
//! error handling, every route) over an in-memory repository.

use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{
    ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION, CONTENT_TYPE, HeaderName, ORIGIN,
};
use actix_web::{test as actix_test, web};
use backend::domain::ports::{PasswordHashError, PasswordHasher};
use backend::domain::{NewUser, Password, PasswordHash, TRACE_ID_HEADER, UserService};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryUserRepository;
use backend::outbound::security::JwtTokenService;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[expect(
    dead_code,
    reason = "server include exposes startup helpers unused by these tests"
)]
#[path = "../src/server/mod.rs"]
mod server;

use server::{AppDependencies, build_app};

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-password";

/// Reversible hasher keeping the suite fast.
struct PlainTextHasher;

impl PasswordHasher for PlainTextHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!("plain${}", password.expose())))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        Ok(hash.as_str() == format!("plain${password}"))
    }
}

struct Harness {
    health: web::Data<HealthState>,
    state: web::Data<HttpState>,
}

impl Harness {
    fn deps(&self) -> AppDependencies {
        AppDependencies {
            health_state: self.health.clone(),
            http_state: self.state.clone(),
        }
    }

    async fn seed_admin(&self) {
        self.state
            .users_command
            .create_user(NewUser::try_from_parts(ADMIN_EMAIL, ADMIN_PASSWORD).expect("admin"))
            .await
            .expect("seed admin");
    }
}

#[fixture]
fn harness() -> Harness {
    let service = UserService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(PlainTextHasher),
    );
    let tokens = JwtTokenService::new(b"integration-test-secret", "users-api", 600);
    Harness {
        health: web::Data::new(HealthState::new()),
        state: web::Data::new(HttpState::from_user_service(service, Arc::new(tokens))),
    }
}

fn login_request() -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/login")
        .set_json(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}))
}

async fn bearer_from(res: ServiceResponse) -> (HeaderName, String) {
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["data"]["tokenType"], "Bearer");
    let token = body["data"]["token"].as_str().expect("token string");
    (AUTHORIZATION, format!("Bearer {token}"))
}

#[rstest]
#[actix_web::test]
async fn admin_session_walks_the_user_lifecycle(harness: Harness) {
    harness.seed_admin().await;
    let app = actix_test::init_service(build_app(harness.deps())).await;
    let auth = bearer_from(actix_test::call_service(&app, login_request().to_request()).await).await;

    let req = actix_test::TestRequest::post()
        .uri("/users")
        .insert_header(auth.clone())
        .set_json(json!({"email": "newuser@gmail.com", "password": "3334455"}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(res).await;
    let id = created["data"]["id"].as_str().expect("id").to_owned();
    assert_eq!(created["data"]["email"], "newuser@gmail.com");

    let req = actix_test::TestRequest::put()
        .uri(&format!("/users/{id}"))
        .insert_header(auth.clone())
        .set_json(json!({"email": "updated_user@gmail.com"}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = actix_test::read_body_json(res).await;
    assert_eq!(updated["data"]["id"], id.as_str());
    assert_eq!(updated["data"]["email"], "updated_user@gmail.com");

    let req = actix_test::TestRequest::get()
        .uri("/users")
        .insert_header(auth.clone())
        .to_request();
    let listed: Value = actix_test::call_and_read_body_json(&app, req).await;
    let users = listed["data"].as_array().expect("data array");
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|user| user.get("password").is_none()));

    let req = actix_test::TestRequest::delete()
        .uri(&format!("/users/{id}"))
        .insert_header(auth.clone())
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let req = actix_test::TestRequest::get()
        .uri(&format!("/users/{id}"))
        .insert_header(auth)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["statusCode"], 404);
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn registering_a_taken_email_is_a_validation_failure(harness: Harness) {
    harness.seed_admin().await;
    let app = actix_test::init_service(build_app(harness.deps())).await;
    let auth = bearer_from(actix_test::call_service(&app, login_request().to_request()).await).await;

    let req = actix_test::TestRequest::post()
        .uri("/users")
        .insert_header(auth)
        .set_json(json!({"email": ADMIN_EMAIL, "password": "123456"}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["statusCode"], 422);
    assert_eq!(body["message"], "Email is already in use");
}

#[rstest]
#[actix_web::test]
async fn wrong_password_does_not_issue_a_token(harness: Harness) {
    harness.seed_admin().await;
    let app = actix_test::init_service(build_app(harness.deps())).await;

    let req = actix_test::TestRequest::post()
        .uri("/login")
        .set_json(json!({"email": ADMIN_EMAIL, "password": "not-the-password"}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["statusCode"], 401);
    assert_eq!(body["error"], "Unauthorized");
    assert!(body.get("data").is_none());
}

#[rstest]
#[case("Bearer not-a-token")]
#[case("Basic YWRtaW46YWRtaW4=")]
#[actix_web::test]
async fn bad_credentials_are_unauthorised(harness: Harness, #[case] header: &str) {
    let app = actix_test::init_service(build_app(harness.deps())).await;

    let req = actix_test::TestRequest::get()
        .uri("/users")
        .insert_header((AUTHORIZATION, header))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_a_bad_request(harness: Harness) {
    let app = actix_test::init_service(build_app(harness.deps())).await;

    let req = actix_test::TestRequest::post()
        .uri("/login")
        .insert_header((CONTENT_TYPE, "application/json"))
        .set_payload("{\"email\":")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn preflight_is_answered_before_authentication(harness: Harness) {
    let app = actix_test::init_service(build_app(harness.deps())).await;

    let req = actix_test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/users")
        .insert_header((ORIGIN, "http://localhost:8080"))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        res.headers()
            .get(ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
}

#[rstest]
#[actix_web::test]
async fn error_responses_carry_cors_and_trace_headers(harness: Harness) {
    let app = actix_test::init_service(build_app(harness.deps())).await;

    let req = actix_test::TestRequest::get().uri("/users").to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN));
    let header_id = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .expect("trace id header")
        .to_owned();
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["traceId"], header_id.as_str());
}

#[rstest]
#[actix_web::test]
async fn readiness_follows_health_state(harness: Harness) {
    let health = harness.health.clone();
    let app = actix_test::init_service(build_app(harness.deps())).await;

    let req = actix_test::TestRequest::get().uri("/health/ready").to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    health.mark_ready();
    let req = actix_test::TestRequest::get().uri("/health/ready").to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn openapi_document_is_served_in_debug_builds(harness: Harness) {
    let app = actix_test::init_service(build_app(harness.deps())).await;

    let req = actix_test::TestRequest::get()
        .uri("/api-docs/openapi.json")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    if cfg!(debug_assertions) {
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert!(body["paths"].get("/users/{id}").is_some());
    } else {
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
