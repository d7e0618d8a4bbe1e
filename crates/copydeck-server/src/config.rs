//! Server configuration
//!
//! Loaded from an optional TOML file, then overridden by CLI flags. The LLM
//! API key is never read from the file; it comes from `GROQ_API_KEY`.

use crate::error::{ServerError, ServerResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the LLM API key
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: SocketAddr,
    /// Directory holding config blobs
    pub blob_root: PathBuf,
    /// Base URL under which blobs are publicly reachable
    pub public_base_url: String,
    /// LLM backend settings
    pub llm: LlmConfig,
    /// Text-to-speech settings
    pub tts: TtsConfig,
    /// Logging settings
    pub log: LogConfig,
}

impl ServerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML source
    ///
    /// # Errors
    /// Returns `ServerError::Config` if the source is not valid TOML for this
    /// structure.
    pub fn from_toml_str(source: &str) -> ServerResult<Self> {
        toml::from_str(source).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns `ServerError::Config` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// With listen address
    #[inline]
    #[must_use]
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// With blob directory
    #[inline]
    #[must_use]
    pub fn with_blob_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.blob_root = root.into();
        self
    }

    /// With public blob base URL
    #[inline]
    #[must_use]
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = url.into();
        self
    }

    /// With LLM API key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.llm.api_key = Some(key.into());
        self
    }

    /// Fill the API key from the environment if not already set
    #[must_use]
    pub fn with_env_api_key(mut self) -> Self {
        if self.llm.api_key.is_none() {
            self.llm.api_key = std::env::var(API_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            blob_root: PathBuf::from("blobs"),
            public_base_url: "http://127.0.0.1:3000/blobs".to_owned(),
            llm: LlmConfig::default(),
            tts: TtsConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// LLM backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible API base
    pub api_base: String,
    /// Model name
    pub model: String,
    /// API key; taken from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Temperature for knowledge-base answers
    pub chat_temperature: f32,
    /// Temperature for sample document generation
    pub sample_temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Request timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.groq.com/openai/v1".to_owned(),
            model: "llama-3.1-8b-instant".to_owned(),
            api_key: None,
            chat_temperature: 0.2,
            sample_temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

/// Text-to-speech settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    /// Speech service host
    pub host: String,
    /// Spoken language
    pub lang: String,
    /// Longest text sent in one request, in characters
    pub max_chars: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TtsConfig {
    /// Request timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            host: "https://translate.google.com".to_owned(),
            lang: "pl".to_owned(),
            max_chars: 200,
            timeout_secs: 10,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub filter: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}
