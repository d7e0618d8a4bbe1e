//! Copydeck Core
//!
//! Pure, synchronous building blocks for operator-editable site copy.
//!
//! # Overview
//!
//! - **OverrideMap**: per-fragment current text plus a rotating list of
//!   alternatives, with the rotation applied on every selection
//! - **TextCatalog**: compiled-in default alternatives per fragment
//! - **CommentList**: design comments pinned to page-relative coordinates
//! - **PageEvent → PageIntent**: explicit mapping from pointer events to
//!   editing intents
//! - **demo**: state machines for the walkthrough and knowledge-base demos
//!
//! # Example
//!
//! ```rust
//! use copydeck_core::{OverrideMap, Selection, TextCatalog};
//!
//! let catalog = TextCatalog::new();
//! let mut overrides = OverrideMap::new();
//!
//! assert_eq!(overrides.text("hero_title", "A"), "A");
//!
//! let outcome = overrides.select("hero_title", "A", "B", &catalog);
//! assert!(matches!(outcome, Selection::Replaced(_)));
//! assert_eq!(overrides.text("hero_title", "A"), "B");
//! assert_eq!(overrides.alternatives("hero_title", &catalog), vec!["A".to_string()]);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod catalog;
pub mod comment;
pub mod demo;
pub mod document;
pub mod error;
pub mod intent;
pub mod overrides;

// Re-exports
pub use catalog::TextCatalog;
pub use comment::{generate_comment_id, CommentList, DesignComment, PagePoint, DEFAULT_AUTHOR};
pub use document::{Document, DocumentKind};
pub use error::{CoreError, CoreResult};
pub use intent::{interpret, Anchor, DocumentSize, Modifiers, PageEvent, PageIntent};
pub use overrides::{rotate_alternatives, OverrideEntry, OverrideMap, Selection};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with site copy
    pub use crate::{
        CommentList, DesignComment, Document, DocumentKind, OverrideEntry, OverrideMap, PageEvent,
        PageIntent, PagePoint, Selection, TextCatalog,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
