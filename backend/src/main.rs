//! User service entry-point: loads settings, installs JSON logging, and
//! serves the REST API.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use user_service::inbound::http::health::HealthState;
use user_service::server::{ServerConfig, ServiceSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = ServerConfig::try_from(&settings).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid bind address {}: {e}", settings.bind_addr()),
        )
    })?;

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
