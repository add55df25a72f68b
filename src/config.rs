//! Gateway configuration from command-line flags and `OPENHUMAN_*` environment variables

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use crate::auth::AuthError;
use crate::backend::DispatchError;
use crate::logging::LogFormat;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "openhuman-mcp-server",
    version,
    about = "MCP gateway letting AI agents hire humans on the OpenHuman marketplace"
)]
pub struct GatewayConfig {
    /// Address to listen on.
    #[arg(long, env = "OPENHUMAN_MCP_ADDR", default_value = "127.0.0.1:3030")]
    pub listen_addr: SocketAddr,

    /// Base URL of the marketplace REST API.
    #[arg(long, env = "OPENHUMAN_BACKEND_URL", default_value = "http://localhost:3000")]
    pub backend_url: String,

    /// Timeout for a single backend call, in seconds.
    #[arg(long, env = "OPENHUMAN_BACKEND_TIMEOUT_SECS", default_value_t = 30)]
    pub backend_timeout_secs: u64,

    /// HTTP path of the JSON-RPC endpoint (also advertised on the event stream).
    #[arg(long, env = "OPENHUMAN_MCP_PATH", default_value = "/api/mcp")]
    pub endpoint_path: String,

    /// Interval between keep-alive pings on the event stream, in seconds.
    #[arg(long, env = "OPENHUMAN_KEEPALIVE_SECS", default_value_t = 30)]
    pub keepalive_secs: u64,

    /// HS256 secret for agent JWTs (min. 32 chars). JWT auth is off when unset.
    #[arg(long, env = "OPENHUMAN_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Refuse `oh_` API keys (JWT-only deployments).
    #[arg(long, env = "OPENHUMAN_DISABLE_API_KEYS", default_value_t = false)]
    pub disable_api_keys: bool,

    /// Requests allowed per client per window on the MCP endpoint. 0 disables limiting.
    #[arg(long, env = "OPENHUMAN_RATE_LIMIT", default_value_t = 200)]
    pub rate_limit: u32,

    /// Rate limit window, in seconds.
    #[arg(long, env = "OPENHUMAN_RATE_WINDOW_SECS", default_value_t = 60)]
    pub rate_window_secs: u64,

    /// Log level (overridden by RUST_LOG).
    #[arg(long, env = "OPENHUMAN_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, env = "OPENHUMAN_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Startup configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("endpoint path must start with '/': {0}")]
    InvalidEndpointPath(String),
    #[error("invalid backend url {url}: {reason}")]
    InvalidBackendUrl { url: String, reason: String },
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("no agent authenticator enabled (API keys disabled and no JWT secret)")]
    NoAuthenticator,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Backend(#[from] DispatchError),
}

impl GatewayConfig {
    /// Check values clap cannot validate on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.endpoint_path.starts_with('/') {
            return Err(ConfigError::InvalidEndpointPath(self.endpoint_path.clone()));
        }

        let url = reqwest::Url::parse(&self.backend_url).map_err(|e| {
            ConfigError::InvalidBackendUrl {
                url: self.backend_url.clone(),
                reason: e.to_string(),
            }
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBackendUrl {
                url: self.backend_url.clone(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        if self.backend_timeout_secs == 0 {
            return Err(ConfigError::ZeroDuration("backend timeout"));
        }
        if self.keepalive_secs == 0 {
            return Err(ConfigError::ZeroDuration("keep-alive interval"));
        }
        if self.rate_limit > 0 && self.rate_window_secs == 0 {
            return Err(ConfigError::ZeroDuration("rate limit window"));
        }
        if self.disable_api_keys && self.jwt_secret.is_none() {
            return Err(ConfigError::NoAuthenticator);
        }
        Ok(())
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }

    pub fn keepalive(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window_secs)
    }
}
