//! LLM backend
//!
//! The endpoints only need single-turn completions. [`GroqClient`] talks to
//! any OpenAI-compatible chat completions API.

use crate::config::LlmConfig;
use crate::error::BackendError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Single-turn completion provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmBackend: Send + Sync + Debug {
    /// Complete `prompt`; `Ok(None)` when the model returned no content
    ///
    /// # Errors
    /// Returns `BackendError` on transport failure, non-OK status, or an
    /// undecodable response.
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<Option<String>, BackendError>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl CompletionResponse {
    fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
    }
}

/// OpenAI-compatible chat completions client
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GroqClient {
    /// Create client from config and an API key
    ///
    /// # Errors
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
            model: config.model.clone(),
        })
    }

    /// Model used for completions
    #[inline]
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmBackend for GroqClient {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<Option<String>, BackendError> {
        let request = CompletionRequest {
            model: &self.model,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
            temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: CompletionResponse = response.json().await?;
        Ok(body.into_content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_shape() {
        let request = CompletionRequest {
            model: "llama-3.1-8b-instant",
            messages: [Message {
                role: "user",
                content: "hi",
            }],
            temperature: 0.2,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama-3.1-8b-instant");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn first_choice_content_is_used() {
        let response: CompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"Tak."}},{"message":{"content":"Nie."}}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_content().as_deref(), Some("Tak."));
    }

    #[test]
    fn missing_or_empty_content_is_none() {
        for raw in [
            r#"{"choices":[]}"#,
            r"{}",
            r#"{"choices":[{"message":null}]}"#,
            r#"{"choices":[{"message":{"content":""}}]}"#,
        ] {
            let response: CompletionResponse = serde_json::from_str(raw).unwrap();
            assert!(response.into_content().is_none(), "{raw}");
        }
    }

    #[test]
    fn client_trims_api_base() {
        let config = LlmConfig {
            api_base: "https://llm.example/v1/".into(),
            ..LlmConfig::default()
        };
        let client = GroqClient::new(&config, "key").unwrap();
        assert_eq!(client.api_base, "https://llm.example/v1");
        assert_eq!(client.model(), "llama-3.1-8b-instant");
    }
}
