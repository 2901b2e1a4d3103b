//! HTTP API for Build Bridge
//!
//! Serves the single-page UI and the per-session chat endpoints it calls.

mod assets;
mod handlers;
mod sessions;
mod types;

pub use handlers::create_router;
pub use sessions::SessionRegistry;

use crate::agent::AgentClient;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub client: Arc<dyn AgentClient>,
    pub agent_id: Arc<str>,
}

impl AppState {
    pub fn new(client: Arc<dyn AgentClient>, agent_id: impl Into<Arc<str>>) -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::new()),
            client,
            agent_id: agent_id.into(),
        }
    }
}
