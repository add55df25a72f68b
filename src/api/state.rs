//! Shared gateway state

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;

use super::sse::session::StreamTracker;
use crate::auth::{AgentAuthenticator, ApiKeyAuthenticator, AuthChain, JwtAuthenticator};
use crate::backend::{Dispatcher, HttpBackend};
use crate::config::{ConfigError, GatewayConfig};
use crate::protocol::ServerInfo;
use crate::rate_limit::{RateLimitStore, RateLimiter};
use crate::server::McpServer;
use crate::tools::ToolCatalog;

/// Default JSON-RPC endpoint path
pub const DEFAULT_ENDPOINT_PATH: &str = "/api/mcp";
/// Default keep-alive interval on the event stream
pub const DEFAULT_KEEPALIVE: Duration = Duration::from_secs(30);

/// Shared application state for the HTTP transports
pub struct GatewayState {
    /// JSON-RPC protocol handler
    pub server: McpServer,
    /// Bearer credential verifier
    pub authenticator: Arc<dyn AgentAuthenticator>,
    /// Request budget for the MCP endpoint (none = unlimited)
    pub rate_limiter: Option<RateLimiter>,
    /// Path advertised to streaming clients
    pub endpoint_path: String,
    /// Keep-alive interval for event streams
    pub keepalive: Duration,
    /// Open event streams
    pub streams: StreamTracker,
    pub started_at: Instant,
    shutdown_tx: watch::Sender<bool>,
}

impl GatewayState {
    pub fn new(server: McpServer, authenticator: Arc<dyn AgentAuthenticator>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            server,
            authenticator,
            rate_limiter: None,
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            keepalive: DEFAULT_KEEPALIVE,
            streams: StreamTracker::new(),
            started_at: Instant::now(),
            shutdown_tx,
        }
    }

    /// Wire up the production stack from configuration. `rate_store` owns the
    /// rate limit window.
    pub fn from_config(
        config: &GatewayConfig,
        rate_store: Arc<dyn RateLimitStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut chain = AuthChain::new();
        if !config.disable_api_keys {
            chain = chain.with(Arc::new(ApiKeyAuthenticator::new()));
        }
        if let Some(secret) = &config.jwt_secret {
            chain = chain.with(Arc::new(JwtAuthenticator::new(secret)?));
        }
        if chain.is_empty() {
            return Err(ConfigError::NoAuthenticator);
        }

        let backend = HttpBackend::new(&config.backend_url, config.backend_timeout())?;
        let server = McpServer::new(
            ServerInfo::default(),
            Arc::new(ToolCatalog::new()),
            Dispatcher::new(Arc::new(backend)),
        );

        let mut state = Self::new(server, Arc::new(chain))
            .with_endpoint_path(config.endpoint_path.clone())
            .with_keepalive(config.keepalive());
        if config.rate_limit > 0 {
            state = state.with_rate_limiter(RateLimiter::new(rate_store, config.rate_limit));
        }
        Ok(state)
    }

    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    pub fn with_endpoint_path(mut self, path: String) -> Self {
        self.endpoint_path = path;
        self
    }

    pub fn with_keepalive(mut self, interval: Duration) -> Self {
        self.keepalive = interval;
        self
    }

    /// Receiver that flips to `true` when the gateway is shutting down
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Ask every open event stream to finish
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }
}
