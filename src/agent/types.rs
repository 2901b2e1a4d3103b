//! Wire types for the conversations API

use super::AgentError;
use serde::{Deserialize, Serialize};

/// Input entry sent with start/append
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationInput {
    pub role: &'static str,
    pub content: String,
}

impl ConversationInput {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Response to both start and append
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConversationResponse {
    /// Always present on start; append responses may omit it
    #[serde(default)]
    pub conversation_id: Option<String>,
    pub outputs: Vec<OutputEntry>,
}

impl ConversationResponse {
    /// Content of the final output entry, which carries the agent's reply
    pub fn last_content(&self) -> Result<&OutputContent, AgentError> {
        self.outputs
            .last()
            .map(|entry| &entry.content)
            .ok_or_else(|| AgentError::malformed("Response contained no outputs"))
    }

    /// Single plain-text output, mostly for tests
    #[cfg(test)]
    pub fn text(conversation_id: &str, text: &str) -> Self {
        Self {
            conversation_id: Some(conversation_id.to_string()),
            outputs: vec![OutputEntry {
                content: OutputContent::Plain(text.to_string()),
            }],
        }
    }
}

/// Output entry. Fields other than `content` (ids, timestamps, agent and
/// model names) are not used.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputEntry {
    pub content: OutputContent,
}

/// Output content is a bare string, a list of typed chunks, or (rarely)
/// some other JSON value that is shown as-is
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OutputContent {
    Plain(String),
    Parts(Vec<ContentPart>),
    Other(serde_json::Value),
}

/// One chunk of output content. Chunks that are not objects, have no
/// `type`, or carry a non-string `text` still parse; they just contribute
/// no text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub struct ContentPart {
    pub kind: Option<String>,
    pub text: Option<String>,
}

impl From<serde_json::Value> for ContentPart {
    fn from(value: serde_json::Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        };
        Self {
            kind: field("type"),
            text: field("text"),
        }
    }
}

impl ContentPart {
    pub fn is_text(&self) -> bool {
        self.kind.as_deref() == Some("text")
    }
}

impl OutputContent {
    /// Renderable text: a plain string as-is, the concatenated text of all
    /// `text` chunks, or the JSON rendering of anything else. Other chunk
    /// types (images, tool references, ...) are dropped.
    pub fn to_text(&self) -> String {
        match self {
            OutputContent::Plain(text) => text.clone(),
            OutputContent::Parts(parts) => parts
                .iter()
                .filter(|part| {
                    if part.is_text() {
                        true
                    } else {
                        tracing::debug!(
                            kind = part.kind.as_deref().unwrap_or("<none>"),
                            "Dropping non-text output chunk"
                        );
                        false
                    }
                })
                .filter_map(|part| part.text.as_deref())
                .collect(),
            OutputContent::Other(value) => value.to_string(),
        }
    }
}
