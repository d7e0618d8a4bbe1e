//! Text Override Store
//!
//! Decides what text each fragment renders and runs the edit menu:
//! - **get_text / get_alternatives**: pure reads with compiled-in fallbacks
//! - **open_editor**: captures the fragment id and the text on screen
//! - **select / submit_custom**: rotate and commit a replacement
//! - **reset**: drop the override entirely
//!
//! Every commit writes the local mirror synchronously and pushes the whole
//! map to the remote in the background.

use crate::lifecycle::{Committed, SyncActivity, SyncPhase, SyncedDocument};
use crate::mirror::LocalMirror;
use crate::remote::RemoteDocuments;
use copydeck_core::{Anchor, OverrideEntry, OverrideMap, Selection, TextCatalog};
use parking_lot::Mutex;
use std::sync::Arc;

/// Open edit menu
#[derive(Debug, Clone, PartialEq)]
struct EditorSession {
    fragment_id: String,
    displayed_text: String,
    anchor: Anchor,
    custom_input: String,
}

/// What the edit menu should show
#[derive(Debug, Clone, PartialEq)]
pub struct EditorView {
    /// Fragment being edited
    pub fragment_id: String,
    /// Text on screen when the menu opened
    pub displayed_text: String,
    /// Menu position in page pixels
    pub anchor: Anchor,
    /// Free-text input contents
    pub custom_input: String,
    /// Pickable alternatives, in display order
    pub alternatives: Vec<String>,
    /// Whether a push is in flight
    pub syncing: bool,
}

impl EditorView {
    /// Whether the custom input can be submitted
    #[inline]
    #[must_use]
    pub fn can_submit_custom(&self) -> bool {
        !self.custom_input.trim().is_empty()
    }
}

/// Per-session store of text overrides
#[derive(Debug)]
pub struct TextOverrideStore {
    document: SyncedDocument<OverrideMap>,
    catalog: TextCatalog,
    editor: Mutex<Option<EditorSession>>,
}

impl TextOverrideStore {
    /// Create store; call [`mount`](Self::mount) before rendering
    #[must_use]
    pub fn new(
        catalog: TextCatalog,
        mirror: Arc<dyn LocalMirror>,
        remote: Arc<dyn RemoteDocuments>,
    ) -> Self {
        Self {
            document: SyncedDocument::new(mirror, remote),
            catalog,
            editor: Mutex::new(None),
        }
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

    /// Text to render for `id`
    #[must_use]
    pub fn get_text(&self, id: &str, default_text: &str) -> String {
        self.document
            .read(|map| map.text(id, default_text).to_owned())
    }

    /// Alternatives offered for `id`
    #[must_use]
    pub fn get_alternatives(&self, id: &str) -> Vec<String> {
        self.document
            .read(|map| map.alternatives(id, &self.catalog))
    }

    /// Open the edit menu for `id`, remembering the text on screen
    ///
    /// Reopening replaces the previous session and clears the custom input.
    pub fn open_editor(&self, id: impl Into<String>, displayed_text: impl Into<String>, anchor: Anchor) {
        let session = EditorSession {
            fragment_id: id.into(),
            displayed_text: displayed_text.into(),
            anchor,
            custom_input: String::new(),
        };
        tracing::debug!("opening editor for {}", session.fragment_id);
        *self.editor.lock() = Some(session);
    }

    /// Snapshot of the open edit menu
    #[must_use]
    pub fn editor(&self) -> Option<EditorView> {
        let session = self.editor.lock().clone()?;
        Some(EditorView {
            alternatives: self.get_alternatives(&session.fragment_id),
            syncing: self.is_syncing(),
            fragment_id: session.fragment_id,
            displayed_text: session.displayed_text,
            anchor: session.anchor,
            custom_input: session.custom_input,
        })
    }

    /// Update the free-text input of the open menu
    pub fn set_custom_input(&self, text: impl Into<String>) {
        if let Some(session) = self.editor.lock().as_mut() {
            session.custom_input = text.into();
        }
    }

    /// Commit the free-text input; ignored while it is blank
    pub fn submit_custom(&self) -> Option<Committed<OverrideEntry>> {
        let input = {
            let editor = self.editor.lock();
            let session = editor.as_ref()?;
            if session.custom_input.trim().is_empty() {
                return None;
            }
            session.custom_input.clone()
        };
        self.select(&input)
    }

    /// Commit `new_text` for the open fragment and close the menu
    ///
    /// Returns `None` (after closing) when no menu is open or nothing changed.
    pub fn select(&self, new_text: &str) -> Option<Committed<OverrideEntry>> {
        let session = self.editor.lock().take()?;
        let catalog = &self.catalog;

        let committed = self.document.commit(|map| {
            match map.select(&session.fragment_id, &session.displayed_text, new_text, catalog) {
                Selection::Replaced(entry) => Some(entry),
                Selection::Unchanged => None,
            }
        });

        match &committed {
            Some(_) => tracing::info!("override set for {}", session.fragment_id),
            None => tracing::debug!("selection unchanged for {}", session.fragment_id),
        }
        committed
    }

    /// Remove the override for `id`, reverting to compiled-in defaults
    pub fn reset(&self, id: &str) -> Committed<Option<OverrideEntry>> {
        {
            let mut editor = self.editor.lock();
            if editor.as_ref().is_some_and(|s| s.fragment_id == id) {
                *editor = None;
            }
        }

        tracing::info!("override reset for {}", id);
        self.document.commit_always(|map| map.remove(id))
    }

    /// Close the menu without committing
    pub fn dismiss_editor(&self) {
        *self.editor.lock() = None;
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

    /// Clone of all overrides
    #[must_use]
    pub fn overrides(&self) -> OverrideMap {
        self.document.snapshot()
    }

    /// Compiled-in defaults
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &TextCatalog {
        &self.catalog
    }
}
