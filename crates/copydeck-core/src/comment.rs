//! Design comments
//!
//! Free-text notes pinned to page-relative percentages so they stay in place
//! when the viewport changes. Comments are created and deleted, never edited.

use crate::document::{Document, DocumentKind};
use crate::error::{CoreError, CoreResult};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Author recorded on new comments
pub const DEFAULT_AUTHOR: &str = "User";

const ID_LEN: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate an opaque 9-character base-36 comment id
#[must_use]
pub fn generate_comment_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ID_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
        .collect()
}

/// Point in percent of document width and height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PagePoint {
    /// Percent of document width
    pub x: f64,
    /// Percent of document height
    pub y: f64,
}

impl PagePoint {
    /// Create point from percentages
    ///
    /// # Errors
    /// Returns `CoreError::NonFiniteCoordinate` for NaN or infinite input.
    pub fn new(x: f64, y: f64) -> CoreResult<Self> {
        if !x.is_finite() || !y.is_finite() {
            return Err(CoreError::NonFiniteCoordinate { x, y });
        }
        Ok(Self { x, y })
    }

    /// Convert a click in page pixels to percentages of the document size
    ///
    /// # Errors
    /// Returns `CoreError::InvalidDocumentSize` when either dimension is not
    /// a positive finite number.
    pub fn from_click(page_x: f64, page_y: f64, width: f64, height: f64) -> CoreResult<Self> {
        let valid = |d: f64| d.is_finite() && d > 0.0;
        if !valid(width) || !valid(height) {
            return Err(CoreError::invalid_document_size(width, height));
        }
        Self::new(page_x / width * 100.0, page_y / height * 100.0)
    }
}

/// Annotation anchored to a page point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignComment {
    /// Opaque random token
    pub id: String,
    /// Note text
    pub text: String,
    /// Percent of document width
    pub x: f64,
    /// Percent of document height
    pub y: f64,
    /// Who left the note
    pub author: String,
    /// Epoch milliseconds
    pub created_at: i64,
}

impl DesignComment {
    /// Create comment with a fresh random id
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        point: PagePoint,
        author: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: generate_comment_id(&mut rand::rng()),
            text: text.into(),
            x: point.x,
            y: point.y,
            author: author.into(),
            created_at,
        }
    }

    /// Anchor point
    #[inline]
    #[must_use]
    pub fn point(&self) -> PagePoint {
        PagePoint {
            x: self.x,
            y: self.y,
        }
    }
}

/// Ordered list of comments, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentList(Vec<DesignComment>);

impl CommentList {
    /// Create empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append comment
    pub fn push(&mut self, comment: DesignComment) {
        self.0.push(comment);
    }

    /// Remove every comment with `id`; returns whether any was removed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|c| c.id != id);
        self.0.len() != before
    }

    /// Comment with `id`
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DesignComment> {
        self.0.iter().find(|c| c.id == id)
    }

    /// Number of comments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comments as a slice
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[DesignComment] {
        &self.0
    }

    /// Iterate comments
    pub fn iter(&self) -> std::slice::Iter<'_, DesignComment> {
        self.0.iter()
    }
}

impl From<Vec<DesignComment>> for CommentList {
    fn from(comments: Vec<DesignComment>) -> Self {
        Self(comments)
    }
}

impl Document for CommentList {
    const KIND: DocumentKind = DocumentKind::Comments;

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
