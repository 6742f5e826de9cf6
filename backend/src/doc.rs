//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the users, login, and health endpoints, the schema
//! wrappers from [`crate::inbound::http::schemas`], and the bearer token
//! security scheme. The document backs Swagger UI (debug builds) and is
//! exported via `cargo run --bin openapi-dump`.

use crate::inbound::http::login::LoginRequest;
use crate::inbound::http::schemas::{
    AccessTokenEnvelopeSchema, AccessTokenSchema, ErrorCodeSchema, ErrorSchema,
    UserEnvelopeSchema, UserListEnvelopeSchema, UserSchema,
};
use crate::inbound::http::users::{CreateUserRequest, UpdateUserRequest};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by POST /login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Users API",
        description = "User management with bearer token authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::login::login,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        UserEnvelopeSchema,
        UserListEnvelopeSchema,
        AccessTokenSchema,
        AccessTokenEnvelopeSchema,
        ErrorSchema,
        ErrorCodeSchema,
        CreateUserRequest,
        UpdateUserRequest,
        LoginRequest,
    )),
    tags(
        (name = "users", description = "User management"),
        (name = "auth", description = "Token issue"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
