//! Agent service error types

use thiserror::Error;

/// Agent service error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AgentError {
    pub kind: AgentErrorKind,
    pub message: String,
}

impl AgentError {
    pub fn new(kind: AgentErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::Network, message)
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::RateLimit, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::ServerError, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::Auth, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::InvalidRequest, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::MalformedResponse, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::Unknown, message)
    }
}

/// Where a remote call went wrong. Informational only: every kind is
/// handled the same way by the turn dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentErrorKind {
    /// Connection failures, timeouts
    Network,
    /// 429
    RateLimit,
    /// 5xx
    ServerError,
    /// 401, 403: bad API key or agent not accessible
    Auth,
    /// 400, 404, 422
    InvalidRequest,
    /// Body did not have the expected shape
    MalformedResponse,
    Unknown,
}
