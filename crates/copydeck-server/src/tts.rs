//! Text-to-speech backend

use crate::config::TtsConfig;
use crate::error::BackendError;
use async_trait::async_trait;
use std::fmt::Debug;

/// Speech synthesis provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechBackend: Send + Sync + Debug {
    /// Synthesize `text` in `lang`, returning MP3 bytes
    ///
    /// # Errors
    /// Returns `BackendError` on transport failure or non-OK status.
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, BackendError>;
}

/// First `max_chars` characters of `text`
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Google Translate speech endpoint
#[derive(Debug, Clone)]
pub struct GoogleTranslateTts {
    client: reqwest::Client,
    host: String,
}

impl GoogleTranslateTts {
    /// Create client from config
    ///
    /// # Errors
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(config: &TtsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_owned(),
        })
    }
}

#[async_trait]
impl SpeechBackend for GoogleTranslateTts {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, BackendError> {
        let textlen = text.chars().count().to_string();
        let response = self
            .client
            .get(format!("{}/translate_tts", self.host))
            .query(&[
                ("ie", "UTF-8"),
                ("q", text),
                ("tl", lang),
                ("total", "1"),
                ("idx", "0"),
                ("textlen", textlen.as_str()),
                ("client", "tw-ob"),
                ("prev", "input"),
                ("ttsspeed", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or_default().to_owned(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
