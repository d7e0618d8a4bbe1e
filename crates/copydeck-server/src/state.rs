//! Shared handler state

use crate::blob::{BlobStore, FsBlobStore};
use crate::config::{LlmConfig, ServerConfig, TtsConfig};
use crate::error::{ServerError, ServerResult};
use crate::llm::{GroqClient, LlmBackend};
use crate::tts::{GoogleTranslateTts, SpeechBackend};
use std::sync::Arc;

/// Backends and settings shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    blobs: Arc<dyn BlobStore>,
    llm: Option<Arc<dyn LlmBackend>>,
    tts: Arc<dyn SpeechBackend>,
    llm_config: Arc<LlmConfig>,
    tts_config: Arc<TtsConfig>,
}

impl AppState {
    /// Create state from explicit backends
    ///
    /// `llm` is `None` when no API key is configured; the LLM endpoints then
    /// answer 500.
    #[must_use]
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        llm: Option<Arc<dyn LlmBackend>>,
        tts: Arc<dyn SpeechBackend>,
    ) -> Self {
        Self {
            blobs,
            llm,
            tts,
            llm_config: Arc::new(LlmConfig::default()),
            tts_config: Arc::new(TtsConfig::default()),
        }
    }

    /// Build the production backends described by `config`
    ///
    /// # Errors
    /// Returns `ServerError::Config` if an HTTP client cannot be built.
    pub fn from_config(config: &ServerConfig) -> ServerResult<Self> {
        let blobs: Arc<dyn BlobStore> = Arc::new(FsBlobStore::new(
            &config.blob_root,
            config.public_base_url.as_str(),
        ));

        let llm = match &config.llm.api_key {
            Some(key) => {
                let client = GroqClient::new(&config.llm, key.as_str())
                    .map_err(|e| ServerError::Config(e.to_string()))?;
                Some(Arc::new(client) as Arc<dyn LlmBackend>)
            }
            None => {
                tracing::warn!("no LLM API key configured; chat endpoints will fail");
                None
            }
        };

        let tts: Arc<dyn SpeechBackend> = Arc::new(
            GoogleTranslateTts::new(&config.tts).map_err(|e| ServerError::Config(e.to_string()))?,
        );

        Ok(Self::new(blobs, llm, tts)
            .with_llm_config(config.llm.clone())
            .with_tts_config(config.tts.clone()))
    }

    /// With LLM settings
    #[must_use]
    pub fn with_llm_config(mut self, config: LlmConfig) -> Self {
        self.llm_config = Arc::new(config);
        self
    }

    /// With TTS settings
    #[must_use]
    pub fn with_tts_config(mut self, config: TtsConfig) -> Self {
        self.tts_config = Arc::new(config);
        self
    }

    /// Blob store
    #[inline]
    #[must_use]
    pub fn blobs(&self) -> &Arc<dyn BlobStore> {
        &self.blobs
    }

    /// LLM backend, if configured
    ///
    /// # Errors
    /// Returns `ServerError::MissingApiKey` when no backend is configured.
    pub fn llm(&self) -> ServerResult<&Arc<dyn LlmBackend>> {
        self.llm.as_ref().ok_or(ServerError::MissingApiKey)
    }

    /// Speech backend
    #[inline]
    #[must_use]
    pub fn tts(&self) -> &Arc<dyn SpeechBackend> {
        &self.tts
    }

    /// LLM settings
    #[inline]
    #[must_use]
    pub fn llm_config(&self) -> &LlmConfig {
        &self.llm_config
    }

    /// TTS settings
    #[inline]
    #[must_use]
    pub fn tts_config(&self) -> &TtsConfig {
        &self.tts_config
    }
}
