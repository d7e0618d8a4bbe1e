//! Editing session
//!
//! Owns both stores for one page session and routes captured page events to
//! them through [`interpret`].

use crate::comment_store::DesignCommentStore;
use crate::config::SyncConfig;
use crate::error::SyncResult;
use crate::mirror::LocalMirror;
use crate::remote::RemoteDocuments;
use crate::text_store::TextOverrideStore;
use copydeck_core::{interpret, PageEvent, PageIntent, TextCatalog};
use std::sync::Arc;

/// Both stores of one session
#[derive(Debug, Clone)]
pub struct ContentSession {
    texts: Arc<TextOverrideStore>,
    comments: Arc<DesignCommentStore>,
}

impl ContentSession {
    /// Create session sharing one mirror and one remote
    #[must_use]
    pub fn new(
        catalog: TextCatalog,
        mirror: Arc<dyn LocalMirror>,
        remote: Arc<dyn RemoteDocuments>,
    ) -> Self {
        Self {
            texts: Arc::new(TextOverrideStore::new(
                catalog,
                Arc::clone(&mirror),
                Arc::clone(&remote),
            )),
            comments: Arc::new(DesignCommentStore::new(mirror, remote)),
        }
    }

    /// Create session backed by a mirror directory and the HTTP endpoint
    ///
    /// # Errors
    /// Returns `SyncError` if the mirror directory or HTTP client cannot be
    /// set up.
    pub fn from_config(config: &SyncConfig, catalog: TextCatalog) -> SyncResult<Self> {
        let mirror: Arc<dyn LocalMirror> = Arc::new(config.open_mirror()?);
        let remote: Arc<dyn RemoteDocuments> = Arc::new(config.http_remote()?);
        tracing::info!("session syncing with {}", config.endpoint);
        Ok(Self::new(catalog, mirror, remote))
    }

    /// Mount both stores concurrently
    pub async fn mount(&self) {
        tokio::join!(self.texts.mount(), self.comments.mount());
    }

    /// Text override store
    #[inline]
    #[must_use]
    pub fn texts(&self) -> &Arc<TextOverrideStore> {
        &self.texts
    }

    /// Design comment store
    #[inline]
    #[must_use]
    pub fn comments(&self) -> &Arc<DesignCommentStore> {
        &self.comments
    }

    /// Apply a captured page event; returns the intent that was acted on
    ///
    /// A placement intent that arrives while a prompt is already open is
    /// reported as [`PageIntent::Ignore`].
    pub fn dispatch(&self, event: PageEvent) -> PageIntent {
        let intent = interpret(event);
        match &intent {
            PageIntent::OpenEditor {
                fragment_id,
                displayed_text,
                anchor,
            } => {
                self.texts
                    .open_editor(fragment_id.as_str(), displayed_text.as_str(), *anchor);
            }
            PageIntent::PlaceComment(point) => {
                if !self.comments.begin_placement(*point) {
                    return PageIntent::Ignore;
                }
            }
            PageIntent::DismissEditor => self.texts.dismiss_editor(),
            PageIntent::Ignore => {}
        }
        intent
    }

    /// Whether either store has a push in flight
    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.texts.is_syncing() || self.comments.is_syncing()
    }
}
