//! API request and response types

use crate::render::markdown_to_html;
use crate::session::{Message, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Static page chrome rendered by the UI
#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub title: &'static str,
    pub icon: &'static str,
    pub tagline: &'static str,
    pub input_placeholder: &'static str,
    pub thinking: &'static str,
    pub reset_label: &'static str,
}

impl PageInfo {
    pub const BRIDGE: PageInfo = PageInfo {
        title: "Build Bridge",
        icon: "🌉",
        tagline: "Your personal coding project mentor — bridging your courses to real projects",
        input_placeholder: "Share your progress, ask for help, or tell me your skills...",
        thinking: "Bridge is thinking... 🦉",
        reset_label: "🆕 Start a New Project (clear chat)",
    };
}

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

/// Transcript entry as rendered by the UI
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub role: Role,
    pub content: String,
    pub html: String,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
            html: markdown_to_html(&message.content),
        }
    }
}

pub fn message_views(transcript: &[Message]) -> Vec<MessageView> {
    transcript.iter().map(MessageView::from).collect()
}

/// Response with a session's transcript
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub messages: Vec<MessageView>,
}

/// Inline error for a failed turn
#[derive(Debug, Serialize)]
pub struct TurnError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

/// Response for a chat turn
#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub messages: Vec<MessageView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TurnError>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
