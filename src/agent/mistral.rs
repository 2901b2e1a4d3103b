//! Mistral Agents conversations API client

use super::{AgentClient, AgentError, ConversationInput, ConversationResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Client for `/v1/conversations`
pub struct MistralClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl MistralClient {
    pub fn new(api_key: impl Into<String>, base_url: Option<&str>) -> Result<Self, AgentError> {
        let base_url = base_url
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AgentError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url,
        })
    }

    fn conversations_url(&self) -> String {
        format!("{}/v1/conversations", self.base_url)
    }

    async fn post(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<ConversationResponse, AgentError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header("accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    AgentError::network(format!("Connection failed: {e}"))
                } else {
                    AgentError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AgentError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(classify_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            AgentError::malformed(format!("Failed to parse response: {e} - body: {body}"))
        })
    }
}

#[async_trait]
impl AgentClient for MistralClient {
    async fn start(
        &self,
        agent_id: &str,
        inputs: &[ConversationInput],
    ) -> Result<ConversationResponse, AgentError> {
        let request = StartRequest { agent_id, inputs };
        self.post(&self.conversations_url(), &request).await
    }

    async fn append(
        &self,
        conversation_id: &str,
        inputs: &[ConversationInput],
    ) -> Result<ConversationResponse, AgentError> {
        let url = format!("{}/{conversation_id}", self.conversations_url());
        self.post(&url, &AppendRequest { inputs }).await
    }
}

/// Map a non-2xx response onto an error kind, preferring the API's own
/// error text over the raw body.
fn classify_error(status: reqwest::StatusCode, body: &str) -> AgentError {
    let message = error_message(body).unwrap_or_else(|| body.to_string());
    match status.as_u16() {
        401 | 403 => AgentError::auth(format!("Authentication failed: {message}")),
        429 => AgentError::rate_limit(format!("Rate limited: {message}")),
        400 | 404 | 422 => AgentError::invalid_request(format!("Invalid request: {message}")),
        500..=599 => AgentError::server_error(format!("Server error: {message}")),
        _ => AgentError::unknown(format!("HTTP {status}: {message}")),
    }
}

fn error_message(body: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "detail"].iter().find_map(|key| match parsed.get(key)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    })
}

// Request bodies

#[derive(Debug, Serialize)]
struct StartRequest<'a> {
    agent_id: &'a str,
    inputs: &'a [ConversationInput],
}

#[derive(Debug, Serialize)]
struct AppendRequest<'a> {
    inputs: &'a [ConversationInput],
}
