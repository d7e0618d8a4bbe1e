//! Design Comment Store
//!
//! Notes pinned to page percentages, synced like the text overrides. A
//! modifier-click opens a placement prompt; submitting it creates the comment.

use crate::lifecycle::{Committed, SyncActivity, SyncPhase, SyncedDocument};
use crate::mirror::LocalMirror;
use crate::remote::RemoteDocuments;
use copydeck_core::{CommentList, DesignComment, PagePoint, DEFAULT_AUTHOR};
use parking_lot::Mutex;
use std::sync::Arc;

/// Per-session store of design comments
#[derive(Debug)]
pub struct DesignCommentStore {
    document: SyncedDocument<CommentList>,
    author: String,
    placement: Mutex<Option<PagePoint>>,
}

impl DesignCommentStore {
    /// Create store; call [`mount`](Self::mount) before rendering
    #[must_use]
    pub fn new(mirror: Arc<dyn LocalMirror>, remote: Arc<dyn RemoteDocuments>) -> Self {
        Self {
            document: SyncedDocument::new(mirror, remote),
            author: DEFAULT_AUTHOR.to_owned(),
            placement: Mutex::new(None),
        }
    }

    /// Record `author` on new comments instead of the default
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Load the local mirror, then reconcile with the remote
    pub async fn mount(&self) {
        self.document.mount().await;
    }

    /// Load the local mirror only
    pub fn load_local(&self) {
        self.document.load_local();
    }

    /// Reconcile with the remote; returns whether remote state was adopted
    pub async fn reconcile(&self) -> bool {
        self.document.reconcile().await
    }

    /// Append a comment at `(x, y)` percent
    ///
    /// Blank text and non-finite coordinates are ignored.
    pub fn add_comment(&self, text: &str, x: f64, y: f64) -> Option<Committed<DesignComment>> {
        if text.trim().is_empty() {
            return None;
        }
        let point = match PagePoint::new(x, y) {
            Ok(point) => point,
            Err(e) => {
                tracing::warn!("ignoring comment: {}", e);
                return None;
            }
        };

        let comment = DesignComment::new(
            text,
            point,
            self.author.as_str(),
            chrono::Utc::now().timestamp_millis(),
        );
        tracing::info!("comment {} added at ({:.1}, {:.1})", comment.id, point.x, point.y);

        self.document.commit(|list| {
            list.push(comment.clone());
            Some(comment)
        })
    }

    /// Remove the comment with `id`
    ///
    /// The snapshot is mirrored and pushed even when `id` is unknown.
    pub fn remove_comment(&self, id: &str) -> Committed<bool> {
        let committed = self.document.commit_always(|list| list.remove(id));
        if committed.value {
            tracing::info!("comment {} removed", id);
        } else {
            tracing::debug!("comment {} not found", id);
        }
        committed
    }

    /// Clone of all comments, oldest first
    #[must_use]
    pub fn comments(&self) -> CommentList {
        self.document.snapshot()
    }

    /// Open the placement prompt at `point`
    ///
    /// Returns `false` when a prompt is already open; the new click is ignored.
    pub fn begin_placement(&self, point: PagePoint) -> bool {
        let mut placement = self.placement.lock();
        if placement.is_some() {
            return false;
        }
        *placement = Some(point);
        true
    }

    /// Where the open prompt points, if any
    #[must_use]
    pub fn placement(&self) -> Option<PagePoint> {
        *self.placement.lock()
    }

    /// Create the comment for the open prompt
    ///
    /// The prompt closes only when a comment was created.
    pub fn submit_placement(&self, text: &str) -> Option<Committed<DesignComment>> {
        let point = self.placement()?;
        let committed = self.add_comment(text, point.x, point.y)?;
        *self.placement.lock() = None;
        Some(committed)
    }

    /// Dismiss the prompt without creating anything
    pub fn cancel_placement(&self) {
        *self.placement.lock() = None;
    }

    /// Whether a push is in flight
    #[inline]
    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.document.activity() == SyncActivity::Syncing
    }

    /// Current load phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.document.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::MemoryMirror;
    use crate::remote::MemoryRemote;
    use copydeck_core::DocumentKind;

    fn store() -> (DesignCommentStore, Arc<MemoryMirror>, Arc<MemoryRemote>) {
        let mirror = Arc::new(MemoryMirror::new());
        let remote = Arc::new(MemoryRemote::new());
        let store = DesignCommentStore::new(mirror.clone(), remote.clone());
        (store, mirror, remote)
    }

    #[tokio::test]
    async fn blank_comment_is_ignored() {
        let (store, _, remote) = store();
        assert!(store.add_comment("", 10.0, 10.0).is_none());
        assert!(store.add_comment("  \n", 10.0, 10.0).is_none());
        assert!(store.comments().is_empty());
        assert!(remote.pushes().is_empty());
    }

    #[tokio::test]
    async fn add_keeps_coordinates_verbatim() {
        let (store, mirror, remote) = store();
        let committed = store.add_comment("note", 50.0, 50.0).unwrap();
        committed.push.finished().await;

        let comment = committed.value;
        assert_eq!((comment.x, comment.y), (50.0, 50.0));
        assert_eq!(comment.author, DEFAULT_AUTHOR);
        assert_eq!(comment.id.len(), 9);
        assert_eq!(store.comments().len(), 1);
        assert!(mirror.get(DocumentKind::Comments.mirror_key()).is_some());

        let pushed = remote.document(DocumentKind::Comments).unwrap();
        assert_eq!(pushed[0]["id"], comment.id.as_str());
        assert!(pushed[0]["createdAt"].is_i64());
    }

    #[tokio::test]
    async fn remove_unknown_id_still_pushes() {
        let (store, _, remote) = store();
        store.add_comment("note", 1.0, 2.0).unwrap().push.finished().await;

        let committed = store.remove_comment("nope");
        assert!(!committed.value);
        committed.push.finished().await;

        assert_eq!(store.comments().len(), 1);
        assert_eq!(remote.pushes().len(), 2);
    }

    #[tokio::test]
    async fn remove_known_id() {
        let (store, _, remote) = store();
        let added = store.add_comment("note", 1.0, 2.0).unwrap();
        added.push.finished().await;
        store.remove_comment(&added.value.id).push.finished().await;
        assert!(store.comments().is_empty());
        assert_eq!(remote.document(DocumentKind::Comments), Some(serde_json::json!([])));
    }

    #[tokio::test]
    async fn placement_prompt_flow() {
        let (store, _, _) = store();
        let point = PagePoint::new(25.0, 75.0).unwrap();

        assert!(store.begin_placement(point));
        assert!(!store.begin_placement(PagePoint::new(1.0, 1.0).unwrap()));
        assert_eq!(store.placement(), Some(point));

        assert!(store.submit_placement("   ").is_none());
        assert_eq!(store.placement(), Some(point), "blank text keeps the prompt open");

        let comment = store.submit_placement("move this").unwrap().value;
        assert_eq!(comment.point(), point);
        assert!(store.placement().is_none());
    }

    #[test]
    fn cancel_placement_creates_nothing() {
        let (store, _, _) = store();
        store.begin_placement(PagePoint::new(5.0, 5.0).unwrap());
        store.cancel_placement();
        assert!(store.placement().is_none());
        assert!(store.comments().is_empty());
    }

    #[tokio::test]
    async fn custom_author() {
        let mirror = Arc::new(MemoryMirror::new());
        let remote = Arc::new(MemoryRemote::new());
        let store = DesignCommentStore::new(mirror, remote).with_author("Designer");
        let comment = store.add_comment("note", 1.0, 1.0).unwrap().value;
        assert_eq!(comment.author, "Designer");
    }
}
