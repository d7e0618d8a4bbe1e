//! Testing utilities for the Copydeck workspace
//!
//! Shared remotes, fixtures, and session builders.

#![allow(missing_docs)]

use async_trait::async_trait;
use copydeck_core::{DocumentKind, TextCatalog};
use copydeck_sync::{
    ContentSession, DesignCommentStore, MemoryMirror, MemoryRemote, RemoteDocuments, RemoteError,
    TextOverrideStore,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Remote whose pushes take a scripted amount of time
///
/// Each push pops the next delay from the script (zero once it runs out),
/// sleeps, then lands in the inner [`MemoryRemote`]. Landing order is
/// recorded so tests can observe reordering.
#[derive(Debug, Default)]
pub struct ScriptedRemote {
    inner: MemoryRemote,
    delays: Mutex<VecDeque<Duration>>,
    landed: Mutex<Vec<(DocumentKind, Value)>>,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_push_delays(self, delays: impl IntoIterator<Item = Duration>) -> Self {
        self.delays.lock().extend(delays);
        self
    }

    pub fn with_document(self, kind: DocumentKind, document: Value) -> Self {
        Self {
            inner: self.inner.with_document(kind, document),
            ..self
        }
    }

    pub fn inner(&self) -> &MemoryRemote {
        &self.inner
    }

    pub fn document(&self, kind: DocumentKind) -> Option<Value> {
        self.inner.document(kind)
    }

    /// Pushes in the order they reached the store
    pub fn landed(&self) -> Vec<(DocumentKind, Value)> {
        self.landed.lock().clone()
    }
}

#[async_trait]
impl RemoteDocuments for ScriptedRemote {
    async fn fetch(&self, kind: DocumentKind) -> Result<Value, RemoteError> {
        self.inner.fetch(kind).await
    }

    async fn push(&self, kind: DocumentKind, document: Value) -> Result<(), RemoteError> {
        let delay = self.delays.lock().pop_front().unwrap_or_default();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.landed.lock().push((kind, document.clone()));
        self.inner.push(kind, document).await
    }
}

/// Catalog used across scenario tests
pub fn sample_catalog() -> TextCatalog {
    TextCatalog::new()
        .with("hero_title", ["Spatial computing for industry", "AR that works on the floor"])
        .with("cta_primary", ["Book a demo", "Talk to us"])
}

/// Text store over fresh in-memory mirror and remote
pub fn text_store(catalog: TextCatalog) -> (TextOverrideStore, Arc<MemoryMirror>, Arc<MemoryRemote>) {
    let mirror = Arc::new(MemoryMirror::new());
    let remote = Arc::new(MemoryRemote::new());
    let store = TextOverrideStore::new(catalog, mirror.clone(), remote.clone());
    (store, mirror, remote)
}

/// Comment store over fresh in-memory mirror and remote
pub fn comment_store() -> (DesignCommentStore, Arc<MemoryMirror>, Arc<MemoryRemote>) {
    let mirror = Arc::new(MemoryMirror::new());
    let remote = Arc::new(MemoryRemote::new());
    let store = DesignCommentStore::new(mirror.clone(), remote.clone());
    (store, mirror, remote)
}

/// Session over a shared in-memory mirror and the given remote
pub fn session_with(remote: Arc<dyn RemoteDocuments>) -> (ContentSession, Arc<MemoryMirror>) {
    let mirror = Arc::new(MemoryMirror::new());
    let session = ContentSession::new(sample_catalog(), mirror.clone(), remote);
    (session, mirror)
}
