//! Client-side sync configuration

use crate::error::SyncResult;
use crate::mirror::FileMirror;
use crate::remote::HttpRemote;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where the stores mirror and push their documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Config endpoint URL
    pub endpoint: String,
    /// Directory for the local mirror files
    pub mirror_dir: PathBuf,
    /// Remote request timeout in seconds
    pub timeout_secs: u64,
}

impl SyncConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With config endpoint
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// With mirror directory
    #[inline]
    #[must_use]
    pub fn with_mirror_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mirror_dir = dir.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Request timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Open the file-backed mirror
    ///
    /// # Errors
    /// Returns `SyncError::Mirror` if the directory cannot be created.
    pub fn open_mirror(&self) -> SyncResult<FileMirror> {
        Ok(FileMirror::open(&self.mirror_dir)?)
    }

    /// Build the HTTP remote
    ///
    /// # Errors
    /// Returns `SyncError::Client` if the HTTP client cannot be built.
    pub fn http_remote(&self) -> SyncResult<HttpRemote> {
        Ok(HttpRemote::new(self.endpoint.as_str(), self.timeout())?)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:3000/api/config".to_owned(),
            mirror_dir: PathBuf::from(".copydeck"),
            timeout_secs: 10,
        }
    }
}
