//! Error types for the server
//!
//! Every handler failure becomes a [`ServerError`]; [`ServerError::status`]
//! and [`ServerError::body`] fix the HTTP contract in one place.

use serde::Serialize;
use warp::http::StatusCode;

/// Errors from blob storage
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// IO error on a blob file
    #[error("io error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored blob is not valid JSON
    #[error("corrupt blob {name}: {source}")]
    Corrupt {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Blob name escapes the store
    #[error("invalid blob name: {0}")]
    InvalidName(String),
}

impl BlobError {
    /// Create IO error for blob
    pub fn io_error(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            name: name.into(),
            source,
        }
    }
}

/// Errors from the LLM and TTS backends
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Request could not be sent or the connection failed
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider answered with a non-success status
    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Provider response could not be decoded
    #[error("undecodable provider response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Server error, one variant per HTTP outcome
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Wrong HTTP method for the endpoint
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Required request field missing or blank
    #[error("missing {0} parameter")]
    MissingParameter(&'static str),

    /// Request body is not valid JSON
    #[error("invalid JSON body: {0}")]
    InvalidBody(String),

    /// LLM API key not configured
    #[error("missing LLM API key")]
    MissingApiKey,

    /// Blob storage failed
    #[error("blob error: {0}")]
    Blob(#[from] BlobError),

    /// LLM call failed
    #[error("llm error: {0}")]
    Llm(#[source] BackendError),

    /// Speech synthesis failed
    #[error("tts error: {0}")]
    Tts(#[source] BackendError),

    /// Configuration could not be loaded
    #[error("config error: {0}")]
    Config(String),
}

/// JSON error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Short, stable message
    pub error: String,
    /// Underlying cause, when it is safe to expose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ServerError {
    /// HTTP status for this error
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingParameter(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::MissingApiKey
            | Self::Blob(_)
            | Self::Llm(_)
            | Self::Tts(_)
            | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body for this error
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        let (error, details) = match self {
            Self::MethodNotAllowed => ("Method not allowed".to_owned(), None),
            Self::MissingParameter(name) => (format!("Missing {name} parameter"), None),
            Self::InvalidBody(message) => ("Invalid JSON body".to_owned(), Some(message.clone())),
            Self::MissingApiKey => (
                "Missing GROQ_API_KEY in environment variables.".to_owned(),
                None,
            ),
            Self::Blob(_) | Self::Config(_) => ("Internal Server Error".to_owned(), None),
            Self::Llm(e) => (
                "Failed to fetch response from Groq LLM".to_owned(),
                Some(e.to_string()),
            ),
            Self::Tts(e) => ("Failed to generate TTS audio".to_owned(), Some(e.to_string())),
        };
        ErrorBody { error, details }
    }
}

/// Result type alias for server operations
pub type ServerResult<T> = Result<T, ServerError>;
