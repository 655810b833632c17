//! Service settings loaded via OrthoConfig and the server configuration
//! derived from them.

use std::net::{AddrParseError, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::problem::DetailMode;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings read from `USER_SERVICE_*` environment variables, configuration
/// files, and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_SERVICE")]
pub struct ServiceSettings {
    /// Return sanitised error details to clients.
    #[ortho_config(default = false)]
    pub debug: bool,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
}

impl ServiceSettings {
    /// Return the configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Detail mode selected by the debug flag.
    pub fn detail_mode(&self) -> DetailMode {
        DetailMode::from_debug_flag(self.debug)
    }
}

/// Configuration consumed by [`super::create_server`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) detail_mode: DetailMode,
}

impl ServerConfig {
    /// Construct a server configuration.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, detail_mode: DetailMode) -> Self {
        Self {
            bind_addr,
            detail_mode,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the detail mode problem responses use.
    #[must_use]
    pub fn detail_mode(&self) -> DetailMode {
        self.detail_mode
    }
}

impl TryFrom<&ServiceSettings> for ServerConfig {
    type Error = AddrParseError;

    fn try_from(settings: &ServiceSettings) -> Result<Self, Self::Error> {
        Ok(Self::new(settings.bind_addr().parse()?, settings.detail_mode()))
    }
}
