//! Text overrides and the alternatives rotation
//!
//! Every fragment id maps to the text currently shown and the values the
//! operator can switch to. Replacing a value pushes the replaced one into the
//! alternatives, so everything that was ever current stays one click away.
//!
//! # Invariants
//! - `current` never appears in `alternatives`
//! - `alternatives` holds unique values, first-seen order preserved

use crate::catalog::TextCatalog;
use crate::document::{Document, DocumentKind};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Operator-chosen value for one fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEntry {
    /// Text currently shown
    pub current: String,
    /// Values the operator can switch to, in picker order
    #[serde(default)]
    pub alternatives: Vec<String>,
}

impl OverrideEntry {
    /// Create entry, enforcing the uniqueness invariants
    #[must_use]
    pub fn new<I, S>(current: impl Into<String>, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let current = current.into();
        let alternatives = alternatives
            .into_iter()
            .map(Into::into)
            .filter(|alt: &String| *alt != current)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        Self {
            current,
            alternatives,
        }
    }

    /// Whether both invariants hold
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let unique: IndexSet<&String> = self.alternatives.iter().collect();
        unique.len() == self.alternatives.len() && !unique.contains(&self.current)
    }
}

/// Outcome of a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Nothing changed (same text, or blank input)
    Unchanged,
    /// Entry was replaced; carries the new entry
    Replaced(OverrideEntry),
}

impl Selection {
    /// Whether the selection changed state
    #[inline]
    #[must_use]
    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced(_))
    }
}

/// Compute the rotated alternatives list
///
/// `selected` is dropped, `previous` is appended, duplicates collapse onto
/// their first occurrence.
#[must_use]
pub fn rotate_alternatives(alternatives: &[String], previous: &str, selected: &str) -> Vec<String> {
    let mut rotated: IndexSet<String> = alternatives
        .iter()
        .filter(|alt| alt.as_str() != selected)
        .cloned()
        .collect();
    if previous != selected {
        rotated.insert(previous.to_owned());
    }
    rotated.into_iter().collect()
}

/// Fragment id → override entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideMap {
    entries: BTreeMap<String, OverrideEntry>,
}

impl OverrideMap {
    /// Create empty map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text to render for `id`
    ///
    /// An empty `current` counts as no override.
    #[must_use]
    pub fn text<'a>(&'a self, id: &str, default_text: &'a str) -> &'a str {
        match self.entries.get(id) {
            Some(entry) if !entry.current.is_empty() => &entry.current,
            _ => default_text,
        }
    }

    /// Alternatives for `id`: the override's own list, else the catalog's
    #[must_use]
    pub fn alternatives(&self, id: &str, catalog: &TextCatalog) -> Vec<String> {
        match self.entries.get(id) {
            Some(entry) => entry.alternatives.clone(),
            None => catalog.alternatives(id).to_vec(),
        }
    }

    /// Replace the text for `id` with `selected`, rotating `displayed` into
    /// the alternatives
    ///
    /// `displayed` is the text that was on screen when the editor opened.
    /// Selecting the displayed text, or blank text, changes nothing. Neither
    /// does any selection when nothing was displayed.
    pub fn select(
        &mut self,
        id: &str,
        displayed: &str,
        selected: &str,
        catalog: &TextCatalog,
    ) -> Selection {
        if displayed.is_empty() || selected == displayed || selected.trim().is_empty() {
            return Selection::Unchanged;
        }

        let alternatives = rotate_alternatives(&self.alternatives(id, catalog), displayed, selected);
        let entry = OverrideEntry {
            current: selected.to_owned(),
            alternatives,
        };
        self.entries.insert(id.to_owned(), entry.clone());
        Selection::Replaced(entry)
    }

    /// Drop the override for `id`, reverting to compiled-in defaults
    pub fn remove(&mut self, id: &str) -> Option<OverrideEntry> {
        self.entries.remove(id)
    }

    /// Insert entry as-is
    pub fn insert(&mut self, id: impl Into<String>, entry: OverrideEntry) {
        self.entries.insert(id.into(), entry);
    }

    /// Entry for `id`
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&OverrideEntry> {
        self.entries.get(id)
    }

    /// Whether `id` has an override
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of overrides
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no overrides
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverrideEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }
}

impl Document for OverrideMap {
    const KIND: DocumentKind = DocumentKind::TextConfig;

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn missing_id_falls_back_to_default() {
        let map = OverrideMap::new();
        assert_eq!(map.text("hero_title", "Default"), "Default");
    }

    #[test]
    fn empty_current_falls_back_to_default() {
        let mut map = OverrideMap::new();
        map.insert("hero_title", OverrideEntry::new("", ["B"]));
        assert_eq!(map.text("hero_title", "Default"), "Default");
    }

    #[test]
    fn catalog_supplies_alternatives_until_overridden() {
        let catalog = TextCatalog::new().with("hero_title", ["B", "C"]);
        let mut map = OverrideMap::new();
        assert_eq!(map.alternatives("hero_title", &catalog), strings(&["B", "C"]));

        map.select("hero_title", "A", "C", &catalog);
        assert_eq!(map.alternatives("hero_title", &catalog), strings(&["B", "A"]));
    }

    #[test]
    fn rotation_appends_previous() {
        let rotated = rotate_alternatives(&strings(&["B", "C"]), "A", "B");
        assert_eq!(rotated, strings(&["C", "A"]));
    }

    #[test]
    fn rotation_keeps_first_occurrence_of_previous() {
        let rotated = rotate_alternatives(&strings(&["A", "B", "C"]), "A", "C");
        assert_eq!(rotated, strings(&["A", "B"]));
    }

    #[test]
    fn rotation_collapses_duplicates() {
        let rotated = rotate_alternatives(&strings(&["B", "B", "D"]), "A", "D");
        assert_eq!(rotated, strings(&["B", "A"]));
    }

    #[test]
    fn selecting_displayed_text_is_a_noop() {
        let catalog = TextCatalog::new();
        let mut map = OverrideMap::new();
        assert_eq!(map.select("hero_title", "A", "A", &catalog), Selection::Unchanged);
        assert!(map.is_empty());
    }

    #[test]
    fn selecting_blank_text_is_a_noop() {
        let catalog = TextCatalog::new();
        let mut map = OverrideMap::new();
        assert_eq!(map.select("hero_title", "A", "   ", &catalog), Selection::Unchanged);
        assert!(map.is_empty());
    }

    #[test]
    fn selecting_with_nothing_displayed_is_a_noop() {
        let catalog = TextCatalog::new().with("cta", ["Talk to us"]);
        let mut map = OverrideMap::new();
        assert_eq!(map.select("cta", "", "Write to us", &catalog), Selection::Unchanged);
        assert!(map.is_empty());
        assert_eq!(map.alternatives("cta", &catalog), strings(&["Talk to us"]));
    }

    #[test]
    fn hero_title_scenario() {
        let catalog = TextCatalog::new();
        let mut map = OverrideMap::new();

        map.select("hero_title", "A", "B", &catalog);
        assert_eq!(map.text("hero_title", "A"), "B");

        map.select("hero_title", "B", "A", &catalog);
        let entry = map.get("hero_title").unwrap();
        assert_eq!(entry.current, "A");
        assert!(entry.alternatives.contains(&"B".to_string()));
        assert!(!entry.alternatives.contains(&"A".to_string()));

        map.remove("hero_title");
        assert_eq!(map.text("hero_title", "A"), "A");
        assert!(map.alternatives("hero_title", &catalog).is_empty());
    }

    #[test]
    fn remove_restores_catalog_list() {
        let catalog = TextCatalog::new().with("cta", ["Talk to us"]);
        let mut map = OverrideMap::new();
        map.select("cta", "Contact", "Write to us", &catalog);
        map.remove("cta");
        assert_eq!(map.alternatives("cta", &catalog), strings(&["Talk to us"]));
    }

    #[test]
    fn entry_constructor_enforces_invariants() {
        let entry = OverrideEntry::new("A", ["A", "B", "B", "C"]);
        assert_eq!(entry.alternatives, strings(&["B", "C"]));
        assert!(entry.is_consistent());
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut map = OverrideMap::new();
        map.insert("hero_title", OverrideEntry::new("B", ["A"]));
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"hero_title": {"current": "B", "alternatives": ["A"]}})
        );
    }

    #[test]
    fn deserializes_entry_without_alternatives() {
        let map: OverrideMap = serde_json::from_str(r#"{"cta": {"current": "Go"}}"#).unwrap();
        assert_eq!(map.get("cta").unwrap().alternatives, Vec::<String>::new());
    }

    proptest! {
        #[test]
        fn prop_rotation_never_duplicates(
            picks in proptest::collection::vec(0usize..5, 1..40),
            seed in proptest::collection::vec("[a-c]{1,2}", 0..4),
        ) {
            let pool = ["alpha", "beta", "gamma", "delta", "epsilon"];
            let catalog = TextCatalog::new().with("f", seed);
            let mut map = OverrideMap::new();
            let mut displayed = "initial".to_string();

            for pick in picks {
                let selected = pool[pick];
                let outcome = map.select("f", &displayed, selected, &catalog);
                if outcome.is_replaced() {
                    displayed = selected.to_string();
                }

                let alternatives = map.alternatives("f", &catalog);
                let unique: IndexSet<&String> = alternatives.iter().collect();
                prop_assert_eq!(unique.len(), alternatives.len());
                prop_assert!(!alternatives.contains(&displayed) || !map.contains("f"));
            }
        }

        #[test]
        fn prop_previous_stays_reachable(
            previous in "[a-z]{1,8}",
            selected in "[a-z]{1,8}",
        ) {
            prop_assume!(previous != selected);
            let catalog = TextCatalog::new();
            let mut map = OverrideMap::new();
            map.select("f", &previous, &selected, &catalog);

            prop_assert_eq!(map.text("f", &previous), selected.as_str());
            let alternatives = map.alternatives("f", &catalog);
            prop_assert!(alternatives.contains(&previous));
            prop_assert!(!alternatives.contains(&selected));
        }
    }
}
