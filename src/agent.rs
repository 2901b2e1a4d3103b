//! Hosted agent service client
//!
//! The agent service keeps the conversation on its side; we only ever start
//! a conversation or append a user turn to an existing one.

mod error;
mod mistral;
mod types;

#[cfg(test)]
pub mod testing;

pub use error::{AgentError, AgentErrorKind};
pub use mistral::{MistralClient, DEFAULT_BASE_URL};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// The two remote conversation operations
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Open a new conversation with `agent_id`
    async fn start(
        &self,
        agent_id: &str,
        inputs: &[ConversationInput],
    ) -> Result<ConversationResponse, AgentError>;

    /// Continue an existing conversation
    async fn append(
        &self,
        conversation_id: &str,
        inputs: &[ConversationInput],
    ) -> Result<ConversationResponse, AgentError>;
}

/// Logging wrapper for agent clients
pub struct LoggingClient {
    inner: Arc<dyn AgentClient>,
}

impl LoggingClient {
    pub fn new(inner: Arc<dyn AgentClient>) -> Self {
        Self { inner }
    }

    fn record(
        operation: &'static str,
        subject: &str,
        started: std::time::Instant,
        result: &Result<ConversationResponse, AgentError>,
    ) {
        let duration = started.elapsed();
        match result {
            Ok(response) => {
                tracing::info!(
                    operation,
                    subject,
                    duration_ms = %duration.as_millis(),
                    conversation_id = response.conversation_id.as_deref().unwrap_or("-"),
                    outputs = response.outputs.len(),
                    "Agent request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    operation,
                    subject,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    error = %e.message,
                    "Agent request failed"
                );
            }
        }
    }
}

#[async_trait]
impl AgentClient for LoggingClient {
    async fn start(
        &self,
        agent_id: &str,
        inputs: &[ConversationInput],
    ) -> Result<ConversationResponse, AgentError> {
        let started = std::time::Instant::now();
        let result = self.inner.start(agent_id, inputs).await;
        Self::record("start", agent_id, started, &result);
        result
    }

    async fn append(
        &self,
        conversation_id: &str,
        inputs: &[ConversationInput],
    ) -> Result<ConversationResponse, AgentError> {
        let started = std::time::Instant::now();
        let result = self.inner.append(conversation_id, inputs).await;
        Self::record("append", conversation_id, started, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{AgentCall, MockAgentClient};
    use super::*;

    #[tokio::test]
    async fn test_logging_client_passes_through() {
        let mock = Arc::new(MockAgentClient::new());
        mock.queue_response(ConversationResponse::text("conv_1", "hello"));
        mock.queue_error(AgentError::network("down"));

        let client = LoggingClient::new(mock.clone());
        let inputs = [ConversationInput::user("hi")];

        let ok = client.start("ag_1", &inputs).await.unwrap();
        assert_eq!(ok.conversation_id.as_deref(), Some("conv_1"));

        let err = client.append("conv_1", &inputs).await.unwrap_err();
        assert_eq!(err.kind, AgentErrorKind::Network);

        assert_eq!(
            mock.recorded_calls(),
            vec![
                AgentCall::Start {
                    agent_id: "ag_1".to_string(),
                    text: "hi".to_string(),
                },
                AgentCall::Append {
                    conversation_id: "conv_1".to_string(),
                    text: "hi".to_string(),
                },
            ]
        );
    }
}
