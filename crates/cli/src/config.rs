//! Configuration loading from toolcall.toml.

use runtime::{ConversationConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiBackend, Strictness};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default config file, looked up in the working directory.
pub const CONFIG_FILE: &str = "toolcall.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub conversation: ConversationSection,
    pub python: PythonConfig,
}

/// Chat-completion endpoint settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// OpenAI-compatible base URL, without `/chat/completions`.
    pub base_url: String,
    pub model: String,
    /// Local servers accept any key.
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: Some("lm-studio".to_string()),
            max_tokens: None,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConversationSection {
    pub tool_temperature: f64,
    pub answer_temperature: f64,
    /// Require an explicit `parameters` object in tool calls.
    pub strict: bool,
}

impl Default for ConversationSection {
    fn default() -> Self {
        let defaults = ConversationConfig::default();
        Self {
            tool_temperature: defaults.tool_temperature,
            answer_temperature: defaults.answer_temperature,
            strict: false,
        }
    }
}

/// Settings for the `run_python` tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PythonConfig {
    pub interpreter: String,
    pub timeout_secs: u64,
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            timeout_secs: 10,
        }
    }
}

impl PythonConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Load `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `TOOLCALL_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("TOOLCALL_API_KEY") {
            self.backend.api_key = Some(key);
        }
        if let Some(model) = lookup("TOOLCALL_MODEL") {
            self.backend.model = model;
        }
        if let Some(url) = lookup("TOOLCALL_BASE_URL") {
            self.backend.base_url = url;
        }
    }

    /// Conversation settings, validated.
    pub fn conversation(&self) -> Result<ConversationConfig, ConfigError> {
        let config = ConversationConfig {
            tool_temperature: self.conversation.tool_temperature,
            answer_temperature: self.conversation.answer_temperature,
            strictness: if self.conversation.strict {
                Strictness::Strict
            } else {
                Strictness::Lenient
            },
        };
        config
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }

    /// Build the completion backend.
    pub fn backend(&self) -> Result<OpenAiBackend, ConfigError> {
        let mut builder = OpenAiBackend::builder(&self.backend.base_url, &self.backend.model)
            .timeout(Duration::from_secs(self.backend.timeout_secs));
        if let Some(key) = &self.backend.api_key {
            builder = builder.api_key(key);
        }
        if let Some(max_tokens) = self.backend.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }
        builder.build().map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}
