pub mod canned;
pub mod http;

pub use canned::CannedResponder;
pub use http::HttpResponder;

use crate::config::Network;
use crate::error::ResponderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration sent when an agent persona is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub network: Network,
    pub enable_conversational: bool,
    pub personality_prompt: String,
    pub name: String,
}

/// Opaque reference to an initialised agent on the responder side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentHandle {
    pub id: u32,
    pub name: String,
}

/// Natural-language statement generation.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn init(&self, config: &AgentConfig) -> Result<AgentHandle, ResponderError>;

    async fn respond(&self, handle: &AgentHandle, prompt: &str) -> Result<String, ResponderError>;
}
