//! Shared helpers for the HTTP integration suites.

use std::sync::Arc;

use actix_web::web;
use user_service::domain::UserService;
use user_service::inbound::http::health::HealthState;
use user_service::inbound::http::problem::{DetailMode, ProblemFormatter};
use user_service::inbound::http::state::HttpState;
use user_service::outbound::persistence::InMemoryUserRepository;
use user_service::server::AppDependencies;

/// Application dependencies backed by `repository`.
pub fn dependencies(repository: Arc<InMemoryUserRepository>, mode: DetailMode) -> AppDependencies {
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(HttpState::from_service(Arc::new(UserService::new(
            repository,
        )))),
        formatter: ProblemFormatter::new(mode),
    }
}
