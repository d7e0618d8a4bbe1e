//! Remote document store
//!
//! The shared copy of each document lives behind the config endpoint: `GET`
//! returns the whole document, `POST` replaces it. There is no versioning and
//! no conflict detection; the last request to land wins.

use crate::error::RemoteError;
use async_trait::async_trait;
use copydeck_core::DocumentKind;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Whole-document remote store
#[async_trait]
pub trait RemoteDocuments: Send + Sync + Debug {
    /// Fetch the stored document for `kind`
    ///
    /// # Errors
    /// Returns `RemoteError` on transport failure, non-OK status, or an
    /// undecodable body.
    async fn fetch(&self, kind: DocumentKind) -> Result<Value, RemoteError>;

    /// Replace the stored document for `kind`
    ///
    /// # Errors
    /// Returns `RemoteError` on transport failure or non-OK status.
    async fn push(&self, kind: DocumentKind, document: Value) -> Result<(), RemoteError>;
}

/// Config endpoint client
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRemote {
    /// Create client for `endpoint` (e.g. `https://site.example/api/config`)
    ///
    /// # Errors
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Create with an existing client
    #[must_use]
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Endpoint base URL
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: reqwest::Method, kind: DocumentKind) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, &self.endpoint);
        match kind.query_discriminator() {
            Some(discriminator) => builder.query(&[("type", discriminator)]),
            None => builder,
        }
    }
}

#[async_trait]
impl RemoteDocuments for HttpRemote {
    async fn fetch(&self, kind: DocumentKind) -> Result<Value, RemoteError> {
        let response = self
            .request(reqwest::Method::GET, kind)
            .send()
            .await
            .map_err(|e| RemoteError::transport(kind, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                kind,
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| RemoteError::Decode {
            kind,
            message: e.to_string(),
        })
    }

    async fn push(&self, kind: DocumentKind, document: Value) -> Result<(), RemoteError> {
        let response = self
            .request(reqwest::Method::POST, kind)
            .json(&document)
            .send()
            .await
            .map_err(|e| RemoteError::transport(kind, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                kind,
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// In-process remote with failure switches
///
/// Serves as the offline backend and as a test double.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    documents: Mutex<HashMap<DocumentKind, Value>>,
    pushes: Mutex<Vec<(DocumentKind, Value)>>,
    fail_fetch: AtomicBool,
    fail_push: AtomicBool,
}

impl MemoryRemote {
    /// Create empty remote
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the stored document for `kind`
    #[must_use]
    pub fn with_document(self, kind: DocumentKind, document: Value) -> Self {
        self.documents.lock().insert(kind, document);
        self
    }

    /// Make fetches fail
    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Make pushes fail
    pub fn set_fail_push(&self, fail: bool) {
        self.fail_push.store(fail, Ordering::SeqCst);
    }

    /// Stored document for `kind`
    #[must_use]
    pub fn document(&self, kind: DocumentKind) -> Option<Value> {
        self.documents.lock().get(&kind).cloned()
    }

    /// Every push received, in arrival order (failed ones included)
    #[must_use]
    pub fn pushes(&self) -> Vec<(DocumentKind, Value)> {
        self.pushes.lock().clone()
    }
}

#[async_trait]
impl RemoteDocuments for MemoryRemote {
    async fn fetch(&self, kind: DocumentKind) -> Result<Value, RemoteError> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable(format!("fetch {kind} disabled")));
        }
        Ok(self
            .document(kind)
            .unwrap_or_else(|| kind.empty_payload()))
    }

    async fn push(&self, kind: DocumentKind, document: Value) -> Result<(), RemoteError> {
        self.pushes.lock().push((kind, document.clone()));
        if self.fail_push.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable(format!("push {kind} disabled")));
        }
        self.documents.lock().insert(kind, document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_remote_serves_empty_payloads() {
        let remote = MemoryRemote::new();
        assert_eq!(remote.fetch(DocumentKind::TextConfig).await.unwrap(), json!({}));
        assert_eq!(remote.fetch(DocumentKind::Comments).await.unwrap(), json!([]));
    }

    #[tokio::test]
    async fn memory_remote_push_replaces_document() {
        let remote = MemoryRemote::new();
        remote
            .push(DocumentKind::TextConfig, json!({"a": {"current": "x"}}))
            .await
            .unwrap();
        remote.push(DocumentKind::TextConfig, json!({})).await.unwrap();
        assert_eq!(remote.document(DocumentKind::TextConfig), Some(json!({})));
        assert_eq!(remote.pushes().len(), 2);
    }

    #[tokio::test]
    async fn memory_remote_failures() {
        let remote = MemoryRemote::new().with_document(DocumentKind::Comments, json!([1]));
        remote.set_fail_fetch(true);
        remote.set_fail_push(true);

        assert!(remote.fetch(DocumentKind::Comments).await.is_err());
        assert!(remote.push(DocumentKind::Comments, json!([])).await.is_err());
        assert_eq!(remote.document(DocumentKind::Comments), Some(json!([1])));
    }

    #[test]
    fn http_remote_keeps_endpoint() {
        let remote = HttpRemote::with_client(reqwest::Client::new(), "http://localhost/api/config");
        assert_eq!(remote.endpoint(), "http://localhost/api/config");
    }
}
