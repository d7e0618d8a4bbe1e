//! Compiled-in default alternatives
//!
//! The catalog is what a fragment offers before any operator has touched it.
//! Once an override exists, its own alternatives list takes precedence.

use crate::error::CoreResult;
use std::collections::HashMap;

/// Default alternatives per fragment id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextCatalog {
    defaults: HashMap<String, Vec<String>>,
}

impl TextCatalog {
    /// Create empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register default alternatives for a fragment
    #[must_use]
    pub fn with<I, S>(mut self, id: impl Into<String>, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(id, alternatives);
        self
    }

    /// Register default alternatives for a fragment, replacing any previous list
    pub fn insert<I, S>(&mut self, id: impl Into<String>, alternatives: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults
            .insert(id.into(), alternatives.into_iter().map(Into::into).collect());
    }

    /// Load catalog from a JSON object of `id → [alternatives]`
    ///
    /// # Errors
    /// Returns `CoreError::Catalog` if the source is not such an object.
    pub fn from_json_str(source: &str) -> CoreResult<Self> {
        let defaults: HashMap<String, Vec<String>> = serde_json::from_str(source)?;
        Ok(Self { defaults })
    }

    /// Default alternatives for `id` (empty if none registered)
    #[inline]
    #[must_use]
    pub fn alternatives(&self, id: &str) -> &[String] {
        self.defaults.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether `id` has registered defaults
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.defaults.contains_key(id)
    }

    /// Number of registered fragments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.defaults.len()
    }

    /// Whether no fragment has defaults
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty()
    }
}
