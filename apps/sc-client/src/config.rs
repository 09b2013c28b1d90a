//! # Client Configuration
//!
//! Settings are layered, later layers winning:
//! 1. defaults from `sc_core::primitives`
//! 2. an optional TOML file
//! 3. environment variables (`SC_CLIENT_URL`, `SC_CLIENT_KEYNODE_CACHE_SIZE`)
//! 4. command-line flags (applied by the CLI)
//!
//! ```toml
//! url = "ws://localhost:8090"
//! keynode_cache_size = 5000
//! connect_timeout_ms = 5000
//! ```

use sc_core::ScError;
use sc_core::primitives::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_KEYNODE_CACHE_SIZE, DEFAULT_SERVER_URL,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const ENV_URL: &str = "SC_CLIENT_URL";
pub const ENV_KEYNODE_CACHE_SIZE: &str = "SC_CLIENT_KEYNODE_CACHE_SIZE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// WebSocket URL of the server.
    pub url: String,
    /// Capacity of the keynode cache.
    pub keynode_cache_size: usize,
    /// How long to wait for the handshake.
    pub connect_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            keynode_cache_size: DEFAULT_KEYNODE_CACHE_SIZE,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ScError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ScError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScError::Io(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ScError> {
        let config: Self =
            toml::from_str(text).map_err(|e| ScError::Config(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from environment variables read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ScError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_URL) {
            self.url = url;
        }
        if let Some(size) = lookup(ENV_KEYNODE_CACHE_SIZE) {
            self.keynode_cache_size = size.trim().parse().map_err(|_| {
                ScError::Config(format!("{ENV_KEYNODE_CACHE_SIZE} must be a number, got '{size}'"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ScError> {
        if !(self.url.starts_with("ws://") || self.url.starts_with("wss://")) {
            return Err(ScError::Config(format!(
                "url must start with ws:// or wss://, got '{}'",
                self.url
            )));
        }
        if self.keynode_cache_size == 0 {
            return Err(ScError::Config(
                "keynode_cache_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_come_from_primitives() {
        let config = ClientConfig::default();
        assert_eq!(config.url, DEFAULT_SERVER_URL);
        assert_eq!(config.keynode_cache_size, DEFAULT_KEYNODE_CACHE_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml_str("url = \"ws://example:9000\"").expect("config");
        assert_eq!(config.url, "ws://example:9000");
        assert_eq!(config.connect_timeout_ms, DEFAULT_CONNECT_TIMEOUT_MS);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            ClientConfig::from_toml_str("port = 1"),
            Err(ScError::Config(_))
        ));
    }

    #[test]
    fn environment_overrides_file() {
        let config = ClientConfig::from_toml_str("keynode_cache_size = 10")
            .and_then(|c| {
                c.with_env(env(&[
                    (ENV_URL, "wss://remote/ws"),
                    (ENV_KEYNODE_CACHE_SIZE, "42"),
                ]))
            })
            .expect("config");
        assert_eq!(config.url, "wss://remote/ws");
        assert_eq!(config.keynode_cache_size, 42);
    }

    #[test]
    fn bad_environment_values_fail() {
        let bad_size = ClientConfig::default().with_env(env(&[(ENV_KEYNODE_CACHE_SIZE, "many")]));
        assert!(matches!(bad_size, Err(ScError::Config(_))));

        let bad_url = ClientConfig::default().with_env(env(&[(ENV_URL, "http://x")]));
        assert!(matches!(bad_url, Err(ScError::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("client.toml");
        std::fs::write(&path, "connect_timeout_ms = 250\n").expect("write");

        let config = ClientConfig::from_file(&path).expect("config");
        assert_eq!(config.connect_timeout(), Duration::from_millis(250));

        let missing = ClientConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ScError::Io(_))));
    }
}
