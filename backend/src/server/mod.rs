//! Server construction and middleware wiring.

mod config;

pub use config::{ServerConfig, ServiceSettings};

use std::sync::Arc;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{ResourceDef, Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, error, web};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::doc::ApiDoc;
use crate::domain::UserService;
use crate::inbound::http::health::{HealthState, health, live, ready};
use crate::inbound::http::problem::ProblemFormatter;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{create_user, delete_user, get_user, list_users, update_user};
use crate::middleware::problem_responses::path_config;
use crate::middleware::{ProblemResponses, SecurityHeaders};
use crate::outbound::persistence::InMemoryUserRepository;

/// Shared state and policy handed to every worker's [`App`].
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub formatter: ProblemFormatter,
}

/// Route patterns served by the API handlers.
const API_ROUTES: [&str; 5] = [
    "/users",
    "/users/{id}",
    "/health",
    "/health/ready",
    "/health/live",
];

/// Fallback for requests no handler accepted.
///
/// A known path reached with an unsupported method is a 405; anything else
/// is a 404.
async fn unmatched_route(req: HttpRequest) -> Result<HttpResponse, actix_web::Error> {
    let known_path = API_ROUTES
        .iter()
        .any(|pattern| ResourceDef::new(*pattern).is_match(req.path()));
    if known_path {
        Err(error::ErrorMethodNotAllowed("Method Not Allowed"))
    } else {
        Err(error::ErrorNotFound("Not Found"))
    }
}

/// Assemble the application: routes, documentation, and middleware.
///
/// Problem conversion runs inside the security header policy, so problem
/// responses carry the same headers as any other response.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        formatter,
    } = deps;

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(path_config())
        .wrap(ProblemResponses::new(formatter))
        .wrap(SecurityHeaders)
        .service(list_users)
        .service(create_user)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
        .service(health)
        .service(ready)
        .service(live)
        .service(SwaggerUi::new("/docs/{_:.*}").url("/openapi.json", ApiDoc::openapi()))
        .default_service(web::to(unmatched_route))
}

/// Construct an Actix HTTP server backed by the in-memory user store.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: bind address and problem detail mode.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let repository = Arc::new(InMemoryUserRepository::new());
    let http_state = web::Data::new(HttpState::from_service(Arc::new(UserService::new(
        repository,
    ))));
    let formatter = ProblemFormatter::new(config.detail_mode);

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            formatter,
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    info!(
        bind_addr = %config.bind_addr,
        detail_mode = ?config.detail_mode,
        "user service listening"
    );
    Ok(server)
}
