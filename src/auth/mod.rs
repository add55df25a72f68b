//! Agent authentication
//!
//! Agents present an opaque bearer credential. Authenticators turn it into an
//! [`AgentIdentity`] or reject it; the gateway never looks inside the token.
//!
//! ## Accepted credentials
//! - `oh_...` API keys ([`ApiKeyAuthenticator`])
//! - HS256 agent tokens when `OPENHUMAN_JWT_SECRET` is set ([`JwtAuthenticator`])

mod api_key;
mod jwt;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};

pub use api_key::ApiKeyAuthenticator;
pub use jwt::{AgentClaims, JwtAuthenticator};

/// Identity of an authenticated agent, forwarded to the backend on every call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentIdentity {
    pub agent_id: String,
}

impl AgentIdentity {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
        }
    }
}

/// Verifies a bearer credential
#[async_trait]
pub trait AgentAuthenticator: Send + Sync {
    /// Returns `None` when the credential is not accepted
    async fn authenticate(&self, token: &str) -> Option<AgentIdentity>;
}

/// Tries each authenticator in order; the first acceptance wins
#[derive(Clone, Default)]
pub struct AuthChain {
    authenticators: Vec<Arc<dyn AgentAuthenticator>>,
}

impl AuthChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, authenticator: Arc<dyn AgentAuthenticator>) -> Self {
        self.authenticators.push(authenticator);
        self
    }

    pub fn len(&self) -> usize {
        self.authenticators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authenticators.is_empty()
    }
}

#[async_trait]
impl AgentAuthenticator for AuthChain {
    async fn authenticate(&self, token: &str) -> Option<AgentIdentity> {
        for authenticator in &self.authenticators {
            if let Some(identity) = authenticator.authenticate(token).await {
                return Some(identity);
            }
        }
        None
    }
}

/// Authentication errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing or invalid Authorization header")]
    MissingToken,
    #[error("Invalid API key")]
    Rejected,
    #[error("Invalid secret: {0}")]
    InvalidSecret(String),
    #[error("Token error: {0}")]
    TokenError(String),
}

/// Extract the credential from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MissingToken),
    }
}

/// Full transport-boundary check: header present, bearer scheme, accepted credential
pub async fn authenticate_headers(
    authenticator: &dyn AgentAuthenticator,
    headers: &HeaderMap,
) -> Result<AgentIdentity, AuthError> {
    let token = bearer_token(headers)?;
    authenticator
        .authenticate(token)
        .await
        .ok_or(AuthError::Rejected)
}
