//! API key authentication for agents

use async_trait::async_trait;

use super::{AgentAuthenticator, AgentIdentity};

/// Prefix carried by every OpenHuman agent API key
pub const API_KEY_PREFIX: &str = "oh_";

/// Accepts `oh_<key>` API keys; the agent id is derived from the key body
#[derive(Debug, Clone, Default)]
pub struct ApiKeyAuthenticator;

impl ApiKeyAuthenticator {
    pub fn new() -> Self {
        Self
    }

    /// Map a key to its agent id: `agent-` + the first 8 characters after the prefix
    pub fn agent_id_for(key: &str) -> Option<String> {
        let body = key.strip_prefix(API_KEY_PREFIX)?;
        if body.is_empty() {
            return None;
        }
        let short: String = body.chars().take(8).collect();
        Some(format!("agent-{}", short))
    }
}

#[async_trait]
impl AgentAuthenticator for ApiKeyAuthenticator {
    async fn authenticate(&self, token: &str) -> Option<AgentIdentity> {
        Self::agent_id_for(token).map(AgentIdentity::new)
    }
}
