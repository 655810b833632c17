//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the user CRUD endpoints, the readiness and liveness
//! probes, and the request, response, and problem schemas. The plain
//! `/health` check is left out. The document is served at `/openapi.json`,
//! rendered by Swagger UI at `/docs`, and exported by the `openapi-dump`
//! binary.

use utoipa::OpenApi;

use crate::inbound::http::problem::ProblemDocument;
use crate::inbound::http::users::{CreateUserRequest, UpdateUserRequest, UserResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User service API",
        description = "CRUD over user records with RFC 7807 problem responses."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(CreateUserRequest, UpdateUserRequest, UserResponse, ProblemDocument)),
    tags(
        (name = "users", description = "Operations on user records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
