//! Session configuration
//!
//! Every knob a session needs is passed in explicitly at construction time;
//! there is no global or implicit state. Values come from a TOML file, the
//! builder methods below, or the defaults.

mod loader;

pub use loader::load_from_path;

use crate::llm::{LlmProvider, ModelParameters, ProviderConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default maximum number of rows any query execution may return
pub const DEFAULT_TOP_K: usize = 5;
/// Default cap on proposal/observation round-trips per session
pub const DEFAULT_MAX_ROUNDS: u32 = 10;
/// Default number of sample rows included in a table description
pub const DEFAULT_SAMPLE_ROWS: usize = 3;
/// Default model request timeout in seconds
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;
/// Default per-tool-call timeout in seconds
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;
/// Default number of forbidden-statement attempts tolerated before aborting
pub const DEFAULT_FORBIDDEN_LIMIT: u32 = 3;

/// Reasoning-loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum rows returned by any query execution
    pub top_k: usize,
    /// Hard cap on proposal/observation rounds before the session gives up
    pub max_rounds: u32,
    /// Sample rows shown per table description
    pub sample_rows: usize,
    /// Timeout for a single model call, in seconds
    pub model_timeout_secs: u64,
    /// Timeout for a single tool invocation, in seconds
    pub tool_timeout_secs: u64,
    /// Abort the session after this many forbidden-statement attempts.
    /// `None` disables the stricter abort and only feeds errors back.
    pub forbidden_limit: Option<u32>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            max_rounds: DEFAULT_MAX_ROUNDS,
            sample_rows: DEFAULT_SAMPLE_ROWS,
            model_timeout_secs: DEFAULT_MODEL_TIMEOUT_SECS,
            tool_timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
            forbidden_limit: Some(DEFAULT_FORBIDDEN_LIMIT),
        }
    }
}

impl AgentConfig {
    /// Set the row cap
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the round cap
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Set the sample-row count for table descriptions
    pub fn with_sample_rows(mut self, sample_rows: usize) -> Self {
        self.sample_rows = sample_rows;
        self
    }

    /// Set the model call timeout
    pub fn with_model_timeout(mut self, secs: u64) -> Self {
        self.model_timeout_secs = secs;
        self
    }

    /// Set the forbidden-statement abort threshold
    pub fn with_forbidden_limit(mut self, limit: Option<u32>) -> Self {
        self.forbidden_limit = limit;
        self
    }

    /// Model call timeout as a [`Duration`]
    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    /// Tool call timeout as a [`Duration`]
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}

/// Database connection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: PathBuf,
}

impl DatabaseConfig {
    /// Create settings for the given database file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Model provider settings as they appear in a config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Which provider API to speak
    pub provider: LlmProvider,
    /// Model name/ID
    pub model: String,
    /// API key; falls back to the provider's environment variable when unset
    pub api_key: Option<String>,
    /// Base URL override
    pub base_url: Option<String>,
    /// Retry attempts for transient request failures
    pub max_retries: Option<u32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    pub temperature: Option<f32>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAi,
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            base_url: None,
            max_retries: None,
            max_tokens: None,
            temperature: None,
        }
    }
}

impl ModelSettings {
    /// Split into the pieces the model client is constructed from
    pub fn into_client_parts(self) -> (LlmProvider, ProviderConfig, ModelParameters) {
        let mut provider_config = ProviderConfig::default();
        provider_config.api_key = self.api_key;
        provider_config.base_url = self.base_url;
        if let Some(retries) = self.max_retries {
            provider_config.max_retries = retries;
        }

        let mut params = ModelParameters::new(self.model);
        params.max_tokens = self.max_tokens;
        params.temperature = self.temperature;

        (self.provider, provider_config, params)
    }
}

/// Complete askdb configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database settings
    pub database: DatabaseConfig,
    /// Model provider settings
    pub model: ModelSettings,
    /// Reasoning-loop settings
    pub agent: AgentConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AgentConfig::default();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.max_rounds, 10);
        assert_eq!(config.sample_rows, 3);
        assert_eq!(config.model_timeout_secs, 60);
        assert_eq!(config.forbidden_limit, Some(3));
    }

    #[test]
    fn builder_methods_chain() {
        let config = AgentConfig::default()
            .with_top_k(7)
            .with_max_rounds(4)
            .with_forbidden_limit(None);
        assert_eq!(config.top_k, 7);
        assert_eq!(config.max_rounds, 4);
        assert_eq!(config.forbidden_limit, None);
    }

    #[test]
    fn model_settings_split_into_client_parts() {
        let settings = ModelSettings {
            provider: LlmProvider::Anthropic,
            model: "claude-sonnet".to_string(),
            api_key: Some("key".to_string()),
            base_url: None,
            max_retries: Some(5),
            max_tokens: Some(1024),
            temperature: None,
        };

        let (provider, provider_config, params) = settings.into_client_parts();
        assert_eq!(provider, LlmProvider::Anthropic);
        assert_eq!(provider_config.api_key.as_deref(), Some("key"));
        assert_eq!(provider_config.max_retries, 5);
        assert_eq!(params.model, "claude-sonnet");
        assert_eq!(params.max_tokens, Some(1024));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [database]
            path = "chinook.db"

            [agent]
            top_k = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.database.path, PathBuf::from("chinook.db"));
        assert_eq!(config.agent.top_k, 3);
        assert_eq!(config.agent.max_rounds, 10);
        assert_eq!(config.model.model, "gpt-4o-mini");
    }
}
