//! Copydeck Server
//!
//! The HTTP surface behind the stores and demos:
//! - Config blob store shared by text overrides and design comments
//! - Knowledge-base chat and sample document generation over an LLM
//! - Short text-to-speech clips for the chat demo
//!
//! # Example
//!
//! ```rust,ignore
//! use copydeck_server::{routes, AppState, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::new().with_env_api_key();
//! let state = AppState::from_config(&config)?;
//! warp::serve(routes(state)).run(config.bind_addr).await;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod blob;
pub mod config;
pub mod error;
pub mod llm;
pub mod prompts;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod tts;

// Re-exports
pub use blob::{BlobStore, FsBlobStore, MemoryBlobStore};
pub use config::{LlmConfig, LogConfig, LogFormat, ServerConfig, TtsConfig, API_KEY_ENV};
pub use error::{BackendError, BlobError, ErrorBody, ServerError, ServerResult};
pub use llm::{GroqClient, LlmBackend};
pub use routes::routes;
pub use state::AppState;
pub use tts::{truncate_chars, GoogleTranslateTts, SpeechBackend};
