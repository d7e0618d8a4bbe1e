//! Copydeck Sync
//!
//! Stateful stores behind the in-page editing surfaces:
//! - Paint from the local mirror immediately
//! - Reconcile with the remote copy once it answers
//! - Mirror every mutation synchronously, push it in the background
//!
//! # Example
//!
//! ```rust,ignore
//! use copydeck_core::TextCatalog;
//! use copydeck_sync::{ContentSession, SyncConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SyncConfig::new().with_endpoint("https://site.example/api/config");
//! let session = ContentSession::from_config(&config, TextCatalog::new())?;
//! session.mount().await;
//!
//! let title = session.texts().get_text("hero_title", "Default title");
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod comment_store;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod mirror;
pub mod remote;
pub mod session;
pub mod text_store;

// Re-exports
pub use comment_store::DesignCommentStore;
pub use config::SyncConfig;
pub use error::{MirrorError, RemoteError, SyncError, SyncResult};
pub use lifecycle::{Committed, PushHandle, SyncActivity, SyncPhase, SyncedDocument};
pub use mirror::{FileMirror, LocalMirror, MemoryMirror};
pub use remote::{HttpRemote, MemoryRemote, RemoteDocuments};
pub use session::ContentSession;
pub use text_store::{EditorView, TextOverrideStore};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the stores
    pub use crate::{
        ContentSession, DesignCommentStore, LocalMirror, RemoteDocuments, SyncConfig, SyncPhase,
        TextOverrideStore,
    };
}
