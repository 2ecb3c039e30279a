//! Configuration loading and validation for Percept.
//!
//! Loads configuration from `~/.percept/config.toml` with environment
//! variable overrides. Every knob has a sensible default so a missing file
//! still yields a runnable (mock-backed) agent.

use percept_core::error::Error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The root configuration structure. Maps directly to `~/.percept/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// The agent's name; also its mailbox name on the mesh.
    #[serde(default = "default_agent_name")]
    pub agent_name: String,

    /// Reasoning/embedding provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Memory settings
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Loop settings
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

fn default_agent_name() -> String {
    "AgentOne".into()
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OpenAI-compatible endpoint base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key. Overridden by `PERCEPT_API_KEY` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Chat model for reasoning.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Model for embeddings.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Dimensionality of the embedding model's vectors.
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_chat_model() -> String {
    "gpt-4o-mini".into()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}
fn default_embedding_dimension() -> usize {
    1536
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            embedding_dimension: default_embedding_dimension(),
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .field("embedding_dimension", &self.embedding_dimension)
            .finish()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("agent_name", &self.agent_name)
            .field("provider", &self.provider)
            .field("memory", &self.memory)
            .field("runtime", &self.runtime)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Short-term recency buffer capacity.
    #[serde(default = "default_short_term_capacity")]
    pub short_term_capacity: usize,

    /// Long-term entries blended into working memory per tick.
    #[serde(default = "default_recall_limit")]
    pub recall_limit: usize,
}

fn default_short_term_capacity() -> usize {
    200
}
fn default_recall_limit() -> usize {
    10
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            short_term_capacity: default_short_term_capacity(),
            recall_limit: default_recall_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Pause between ticks, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Time-sensor interval, in seconds. 0 disables the time sensor.
    #[serde(default = "default_time_sensor_secs")]
    pub time_sensor_secs: u64,
}

fn default_tick_interval_ms() -> u64 {
    100
}
fn default_time_sensor_secs() -> u64 {
    300
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            time_sensor_secs: default_time_sensor_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            agent_name: default_agent_name(),
            provider: ProviderConfig::default(),
            memory: MemoryConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".percept")
    }

    /// The default config path: `~/.percept/config.toml`.
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load from the given path, falling back to defaults when the file is
    /// missing, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                let config: AppConfig = toml::from_str(&raw).map_err(|e| Error::Config {
                    message: format!("failed to parse {}: {e}", path.display()),
                })?;
                debug!(path = %path.display(), "Loaded configuration");
                config
            }
            _ => {
                debug!("No config file, using defaults");
                AppConfig::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("PERCEPT_API_KEY") {
            if !key.is_empty() {
                self.provider.api_key = Some(key);
            }
        }
        if let Ok(url) = std::env::var("PERCEPT_BASE_URL") {
            if !url.is_empty() {
                self.provider.base_url = url;
            }
        }
        if let Ok(name) = std::env::var("PERCEPT_AGENT_NAME") {
            if !name.is_empty() {
                self.agent_name = name;
            }
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.agent_name.trim().is_empty() {
            return Err(Error::Config {
                message: "agent_name must not be empty".into(),
            });
        }
        if self.memory.short_term_capacity == 0 {
            return Err(Error::Config {
                message: "memory.short_term_capacity must be at least 1".into(),
            });
        }
        if self.provider.embedding_dimension == 0 {
            return Err(Error::Config {
                message: "provider.embedding_dimension must be at least 1".into(),
            });
        }
        Ok(())
    }
}

fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_canonical_policy() {
        let config = AppConfig::default();
        assert_eq!(config.memory.short_term_capacity, 200);
        assert_eq!(config.memory.recall_limit, 10);
        assert_eq!(config.runtime.tick_interval_ms, 100);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load(Some(Path::new("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config.agent_name, "AgentOne");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
agent_name = "Smith"

[provider]
base_url = "http://localhost:1234/v1"
"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.agent_name, "Smith");
        assert_eq!(config.provider.base_url, "http://localhost:1234/v1");
        assert_eq!(config.memory.short_term_capacity, 200);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[memory]\nshort_term_capacity = 0\n").unwrap();

        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("short_term_capacity"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let mut config = AppConfig::default();
        config.provider.api_key = Some("sk-secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
