use super::{AgentConfig, AgentHandle, Responder};
use crate::config::NetworkConfig;
use crate::error::{ConfigError, ResponderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct CreateAgentsRequest<'a> {
    pub configs: Vec<&'a AgentConfig>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAgentsResponse {
    pub success: bool,
    #[serde(default)]
    pub agents: Vec<AgentHandle>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest<'a> {
    pub agent_id: u32,
    pub prompt: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn create_result(response: CreateAgentsResponse) -> Result<AgentHandle, ResponderError> {
    if !response.success {
        return Err(ResponderError::provider(
            response
                .error
                .unwrap_or_else(|| "Failed to initialize agent".to_string()),
        ));
    }

    response
        .agents
        .into_iter()
        .next()
        .ok_or_else(|| ResponderError::provider("agent service returned no agents"))
}

/// A 404 means the service forgot the agent; the body is not worth decoding.
fn check_chat_status(status: reqwest::StatusCode, agent_id: u32) -> Result<(), ResponderError> {
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ResponderError::AgentNotFound(agent_id));
    }
    Ok(())
}

fn chat_result(response: ChatResponse) -> Result<String, ResponderError> {
    match (response.success, response.response) {
        (true, Some(text)) => Ok(text),
        (true, None) => Err(ResponderError::provider("empty chat response")),
        (false, _) => Err(ResponderError::provider(
            response
                .error
                .unwrap_or_else(|| "Failed to process chat".to_string()),
        )),
    }
}

/// Responder backed by the agents HTTP service.
pub struct HttpResponder {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpResponder {
    pub fn new(config: &NetworkConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::invalid(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/agents", config.responder_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl Responder for HttpResponder {
    async fn init(&self, config: &AgentConfig) -> Result<AgentHandle, ResponderError> {
        let response: CreateAgentsResponse = self
            .client
            .post(&self.endpoint)
            .json(&CreateAgentsRequest {
                configs: vec![config],
            })
            .send()
            .await?
            .json()
            .await?;

        let handle = create_result(response)?;

        tracing::debug!("Initialised remote agent {} as #{}", handle.name, handle.id);
        Ok(handle)
    }

    async fn respond(&self, handle: &AgentHandle, prompt: &str) -> Result<String, ResponderError> {
        let http_response = self
            .client
            .put(&self.endpoint)
            .json(&ChatRequest {
                agent_id: handle.id,
                prompt,
            })
            .send()
            .await?;

        check_chat_status(http_response.status(), handle.id)?;

        let response: ChatResponse = http_response.json().await?;
        chat_result(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Network;

    #[test]
    fn test_create_request_wire_shape() {
        let config = AgentConfig {
            network: Network::Testnet,
            enable_conversational: true,
            personality_prompt: "You are Nancy.".to_string(),
            name: "Nervous Nancy".to_string(),
        };
        let json = serde_json::to_value(CreateAgentsRequest {
            configs: vec![&config],
        })
        .unwrap();

        assert_eq!(json["configs"][0]["name"], "Nervous Nancy");
        assert_eq!(json["configs"][0]["enableConversational"], true);
        assert_eq!(json["configs"][0]["personalityPrompt"], "You are Nancy.");
        assert_eq!(json["configs"][0]["network"], "testnet");
    }

    #[test]
    fn test_chat_shapes() {
        let json = serde_json::to_value(ChatRequest {
            agent_id: 3,
            prompt: "round 1",
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "agentId": 3, "prompt": "round 1" }));

        let response: ChatResponse =
            serde_json::from_str(r#"{"success":false,"error":"Agent not found"}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Agent not found"));
    }

    #[test]
    fn test_create_response_parses_agents() {
        let response: CreateAgentsResponse = serde_json::from_str(
            r#"{"success":true,"agents":[{"id":0,"name":"Detective Dave"}]}"#,
        )
        .unwrap();
        assert_eq!(
            response.agents,
            vec![AgentHandle {
                id: 0,
                name: "Detective Dave".to_string()
            }]
        );
    }

    #[test]
    fn test_chat_envelope_mapping() {
        assert!(check_chat_status(reqwest::StatusCode::OK, 4).is_ok());
        assert!(matches!(
            check_chat_status(reqwest::StatusCode::NOT_FOUND, 4),
            Err(ResponderError::AgentNotFound(4))
        ));

        let ok: ChatResponse =
            serde_json::from_str(r#"{"success":true,"response":"Not me."}"#).unwrap();
        assert_eq!(chat_result(ok).unwrap(), "Not me.");

        let failed: ChatResponse =
            serde_json::from_str(r#"{"success":false,"error":"model overloaded"}"#).unwrap();
        match chat_result(failed) {
            Err(ResponderError::Provider(msg)) => assert_eq!(msg, "model overloaded"),
            other => panic!("unexpected {:?}", other),
        }

        let empty: ChatResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(chat_result(empty), Err(ResponderError::Provider(_))));
    }

    #[test]
    fn test_create_envelope_mapping() {
        let failed: CreateAgentsResponse =
            serde_json::from_str(r#"{"success":false,"error":"quota"}"#).unwrap();
        match create_result(failed) {
            Err(ResponderError::Provider(msg)) => assert_eq!(msg, "quota"),
            other => panic!("unexpected {:?}", other),
        }

        let none: CreateAgentsResponse =
            serde_json::from_str(r#"{"success":true,"agents":[]}"#).unwrap();
        assert!(create_result(none).is_err());
    }
}
