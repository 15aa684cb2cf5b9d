//! Append-only mapping from original to relocated import paths.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::import_path::ImportPath;

/// Maps every package selected for extraction to its relocated import path.
///
/// Entries are only ever added. Iteration is ordered by original path so that
/// everything derived from the map is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentifierMap {
    entries: BTreeMap<ImportPath, ImportPath>,
}

impl IdentifierMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `original -> relocated`.
    ///
    /// Returns `false` and leaves the existing entry in place if `original`
    /// was already recorded.
    pub fn insert(&mut self, original: ImportPath, relocated: ImportPath) -> bool {
        if self.entries.contains_key(&original) {
            return false;
        }
        self.entries.insert(original, relocated);
        true
    }

    /// Returns the relocated path for `original`, if it is being extracted.
    #[must_use]
    pub fn lookup(&self, original: &ImportPath) -> Option<&ImportPath> {
        self.entries.get(original)
    }

    /// Like [`IdentifierMap::lookup`] but keyed by a string slice.
    #[must_use]
    pub fn lookup_str(&self, original: &str) -> Option<&ImportPath> {
        self.entries.get(&ImportPath::from(original))
    }

    /// Returns `true` if `original` is being extracted.
    #[must_use]
    pub fn contains(&self, original: &ImportPath) -> bool {
        self.entries.contains_key(original)
    }

    /// Number of packages in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(original, relocated)` pairs ordered by original path.
    pub fn iter(&self) -> impl Iterator<Item = (&ImportPath, &ImportPath)> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a IdentifierMap {
    type Item = (&'a ImportPath, &'a ImportPath);
    type IntoIter = std::collections::btree_map::Iter<'a, ImportPath, ImportPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
