//! Turn dispatch
//!
//! One user submission becomes one remote call: `start` while the session
//! has no conversation handle, `append` afterwards. The session is only
//! touched after the reply has been fully extracted, so a failed call leaves
//! the handle exactly as it was.

#[cfg(test)]
mod proptests;

use crate::agent::{AgentClient, AgentError, ConversationInput};
use crate::session::{ConversationHandle, Message, SessionState};
use thiserror::Error;

/// Shown under the error message of a failed turn
pub const FAILURE_HINT: &str = "Check your Agent ID, API key, and internet connection.";

/// Result of a successful turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub reply: String,
    /// True when this turn opened the remote conversation
    pub started: bool,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Message text is empty")]
    EmptyMessage,
    #[error("Oops! Something went wrong: {0}")]
    RemoteCallFailed(#[source] AgentError),
}

impl DispatchError {
    /// Remediation hint shown to the user, if any
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            DispatchError::EmptyMessage => None,
            DispatchError::RemoteCallFailed(_) => Some(FAILURE_HINT),
        }
    }
}

/// Record `text` as a user message, forward it to the agent and record the
/// reply.
///
/// On `RemoteCallFailed` the transcript ends at the user message and the
/// handle is unchanged. `EmptyMessage` leaves the state untouched.
pub async fn handle_user_message(
    state: &mut SessionState,
    client: &dyn AgentClient,
    agent_id: &str,
    text: &str,
) -> Result<Turn, DispatchError> {
    if text.trim().is_empty() {
        return Err(DispatchError::EmptyMessage);
    }

    state.push(Message::user(text));

    let inputs = [ConversationInput::user(text)];
    let exchange = match state.handle() {
        None => start(client, agent_id, &inputs).await,
        Some(handle) => append(client, handle, &inputs).await,
    };

    let (new_handle, reply) = exchange.map_err(|e| {
        tracing::warn!(error = %e, kind = ?e.kind, "Turn failed");
        DispatchError::RemoteCallFailed(e)
    })?;

    let started = new_handle.is_some();
    if let Some(handle) = new_handle {
        tracing::info!(conversation_id = %handle, "Conversation started");
        state.set_handle(handle);
    }
    state.push(Message::assistant(reply.clone()));

    Ok(Turn { reply, started })
}

async fn start(
    client: &dyn AgentClient,
    agent_id: &str,
    inputs: &[ConversationInput],
) -> Result<(Option<ConversationHandle>, String), AgentError> {
    let response = client.start(agent_id, inputs).await?;
    let reply = response.last_content()?.to_text();
    let handle = response
        .conversation_id
        .map(ConversationHandle::new)
        .ok_or_else(|| AgentError::malformed("Start response did not include a conversation_id"))?;
    Ok((Some(handle), reply))
}

async fn append(
    client: &dyn AgentClient,
    handle: &ConversationHandle,
    inputs: &[ConversationInput],
) -> Result<(Option<ConversationHandle>, String), AgentError> {
    let response = client.append(handle.as_str(), inputs).await?;
    let reply = response.last_content()?.to_text();
    Ok((None, reply))
}
