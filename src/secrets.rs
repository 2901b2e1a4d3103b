//! Startup secrets
//!
//! The API key and agent id come from the process environment first and
//! fall back to a TOML secret store file. Both are required: there is no
//! degraded mode without them.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SECRETS_PATH_VAR: &str = "BRIDGE_SECRETS_PATH";
pub const DEFAULT_SECRETS_PATH: &str = ".bridge/secrets.toml";

/// A required secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretName {
    ApiKey,
    AgentId,
}

impl SecretName {
    /// Environment variable and secret store key
    pub fn var(self) -> &'static str {
        match self {
            SecretName::ApiKey => "MISTRAL_API_KEY",
            SecretName::AgentId => "MISTRAL_AGENT_ID",
        }
    }
}

impl fmt::Display for SecretName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SecretName::ApiKey => "Mistral API Key",
            SecretName::AgentId => "Agent ID",
        })
    }
}

#[derive(Debug, Error)]
pub enum SecretsError {
    #[error(
        "Missing {name}: add `{var}` to your environment or to the secret store at {path}",
        var = .name.var(),
        path = .store.display()
    )]
    Missing { name: SecretName, store: PathBuf },
}

/// Key/value secrets read from a TOML file of top-level strings
#[derive(Debug, Clone, Default)]
pub struct SecretStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl SecretStore {
    /// Store at `BRIDGE_SECRETS_PATH`, or the default location
    pub fn from_env() -> Self {
        let path = std::env::var(SECRETS_PATH_VAR)
            .unwrap_or_else(|_| DEFAULT_SECRETS_PATH.to_string());
        Self::load(path)
    }

    /// Load a store file. A missing file yields an empty store; an
    /// unreadable one is logged and also treated as empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => match parse_store(&contents) {
                Ok(values) => {
                    tracing::debug!(
                        path = %path.display(),
                        keys = values.len(),
                        "Loaded secret store"
                    );
                    values
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Ignoring unparsable secret store"
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Ignoring unreadable secret store"
                );
                HashMap::new()
            }
        };
        Self { path, values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_store(contents: &str) -> Result<HashMap<String, String>, toml::de::Error> {
    let table: toml::Table = contents.parse()?;
    Ok(table
        .into_iter()
        .filter_map(|(key, value)| match value {
            toml::Value::String(s) => Some((key, s)),
            _ => None,
        })
        .collect())
}

/// Resolved credentials
#[derive(Clone)]
pub struct Secrets {
    pub api_key: String,
    pub agent_id: String,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("api_key", &"<redacted>")
            .field("agent_id", &self.agent_id)
            .finish()
    }
}

impl Secrets {
    /// Resolve from the process environment, then `store`
    pub fn resolve(store: &SecretStore) -> Result<Self, SecretsError> {
        Self::resolve_with(|key| std::env::var(key).ok(), store)
    }

    fn resolve_with(
        env: impl Fn(&str) -> Option<String>,
        store: &SecretStore,
    ) -> Result<Self, SecretsError> {
        let lookup = |name: SecretName| {
            env(name.var())
                .filter(|v| !v.is_empty())
                .or_else(|| {
                    store
                        .get(name.var())
                        .filter(|v| !v.is_empty())
                        .map(str::to_string)
                })
                .ok_or_else(|| SecretsError::Missing {
                    name,
                    store: store.path().to_path_buf(),
                })
        };

        Ok(Self {
            api_key: lookup(SecretName::ApiKey)?,
            agent_id: lookup(SecretName::AgentId)?,
        })
    }
}
