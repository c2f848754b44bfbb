//! Lookup of server-held credentials.
//!
//! Secrets are resolved on every request and never cached.

use secrecy::Secret;
use std::collections::HashMap;
use std::env;

/// Read-only source of named secrets.
pub trait SecretStore: Send + Sync {
    /// Returns the secret, or `None` when it is absent or empty.
    fn lookup(&self, name: &str) -> Option<Secret<String>>;
}

/// Reads secrets from the process environment at call time.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretStore;

impl SecretStore for EnvSecretStore {
    fn lookup(&self, name: &str) -> Option<Secret<String>> {
        env::var(name)
            .ok()
            .filter(|value| !value.is_empty())
            .map(Secret::new)
    }
}

/// Fixed set of secrets, used by tests and local tooling.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<String, String>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

impl SecretStore for StaticSecretStore {
    fn lookup(&self, name: &str) -> Option<Secret<String>> {
        self.secrets
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
            .map(Secret::new)
    }
}
