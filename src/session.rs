//! Per-session chat state
//!
//! A session owns the visible transcript and, once the first exchange has
//! succeeded, the handle of the remote conversation it belongs to.

use serde::Serialize;
use std::fmt;

/// Greeting every session (and every reset) starts with.
pub const SEED_GREETING: &str = "Hey! 👋\n\nI'm Bridge 🦉, your friendly coding mentor!\n\nTell me  what kind of adventure do you want to have today! 🎉";

/// Author of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry. Never edited after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Identifier the agent service issues for a conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConversationHandle(String);

impl ConversationHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transcript plus remote conversation handle.
///
/// The handle is `None` until the first successful exchange and goes back to
/// `None` only through [`SessionState::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    transcript: Vec<Message>,
    handle: Option<ConversationHandle>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            transcript: vec![Message::assistant(SEED_GREETING)],
            handle: None,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn handle(&self) -> Option<&ConversationHandle> {
        self.handle.as_ref()
    }

    /// Drop the transcript and forget the remote conversation
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.transcript.push(message);
    }

    pub(crate) fn set_handle(&mut self, handle: ConversationHandle) {
        debug_assert!(self.handle.is_none(), "conversation handle assigned twice");
        self.handle = Some(handle);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
