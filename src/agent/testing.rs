//! Mock agent client for testing
//!
//! Returns queued responses in order and records every call it receives.

use super::{AgentClient, AgentError, ConversationInput, ConversationResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A call observed by [`MockAgentClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentCall {
    Start { agent_id: String, text: String },
    Append { conversation_id: String, text: String },
}

pub struct MockAgentClient {
    responses: Mutex<VecDeque<Result<ConversationResponse, AgentError>>>,
    calls: Mutex<Vec<AgentCall>>,
}

impl MockAgentClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_response(&self, response: ConversationResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn queue_error(&self, error: AgentError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_calls(&self) -> Vec<AgentCall> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self) -> Result<ConversationResponse, AgentError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::network("No mock response queued")))
    }
}

impl Default for MockAgentClient {
    fn default() -> Self {
        Self::new()
    }
}

fn joined_text(inputs: &[ConversationInput]) -> String {
    inputs.iter().map(|i| i.content.as_str()).collect()
}

#[async_trait]
impl AgentClient for MockAgentClient {
    async fn start(
        &self,
        agent_id: &str,
        inputs: &[ConversationInput],
    ) -> Result<ConversationResponse, AgentError> {
        self.calls.lock().unwrap().push(AgentCall::Start {
            agent_id: agent_id.to_string(),
            text: joined_text(inputs),
        });
        self.next()
    }

    async fn append(
        &self,
        conversation_id: &str,
        inputs: &[ConversationInput],
    ) -> Result<ConversationResponse, AgentError> {
        self.calls.lock().unwrap().push(AgentCall::Append {
            conversation_id: conversation_id.to_string(),
            text: joined_text(inputs),
        });
        self.next()
    }
}
