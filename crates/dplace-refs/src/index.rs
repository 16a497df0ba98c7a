//! Lookup from citation key strings to canonical bibliography identifiers.
//!
//! Sheets cite the same entry in several surface forms: with or without
//! parentheses around the year, with `and` or `&` between authors, and
//! with `[?]` where the bibliography says `(nd)`. Every entry therefore
//! registers each of these forms, all pointing at its one identifier.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

/// One bibliography entry as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibliographyRecord {
    /// Citation key as the sheets write it, e.g. `"Smith (1925b)"`.
    pub key: String,
    /// Canonical identifier, e.g. the BibTeX entry id.
    pub id: String,
}

impl BibliographyRecord {
    pub fn new(key: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            id: id.into(),
        }
    }
}

/// The surface forms registered for a bibliography key, primary form first.
///
/// ```
/// use dplace_refs::index::variants;
///
/// assert_eq!(
///     variants("Seligman and Seligman (1932)"),
///     [
///         "Seligman and Seligman (1932)",
///         "Seligman and Seligman 1932",
///         "Seligman & Seligman (1932)",
///         "Seligman & Seligman 1932",
///     ]
/// );
/// ```
pub fn variants(key: &str) -> Vec<String> {
    let without_parens = |s: &str| s.replace(['(', ')'], "");
    let ampersand = key.replace(" and ", " & ");

    let mut forms = vec![
        key.to_string(),
        without_parens(key),
        ampersand.clone(),
        without_parens(&ampersand),
        key.replace("(nd)", "[?]"),
    ];

    let mut seen = std::collections::HashSet::new();
    forms.retain(|form| seen.insert(form.clone()));
    forms
}

/// Key-to-identifier lookup shared by every resolution in a run.
///
/// Built once from the bibliography and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct BibliographyIndex {
    keys: HashMap<String, String>,
}

impl BibliographyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from bibliography records.
    ///
    /// Fails with [`Error::IndexCollision`] if two records with different
    /// identifiers register the same key string.
    pub fn build(records: impl IntoIterator<Item = BibliographyRecord>) -> Result<Self> {
        let mut index = Self::new();
        for record in records {
            index.insert(&record)?;
        }
        Ok(index)
    }

    /// Register `record` under its key and every variant of it.
    ///
    /// Registering a record again is a no-op.
    pub fn insert(&mut self, record: &BibliographyRecord) -> Result<()> {
        let key: String = record.key.nfc().collect();
        for form in variants(&key) {
            match self.keys.entry(form) {
                Entry::Occupied(existing) => {
                    if existing.get() != &record.id {
                        return Err(Error::IndexCollision {
                            key: existing.key().clone(),
                            existing: existing.get().clone(),
                            conflicting: record.id.clone(),
                        });
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(record.id.clone());
                }
            }
        }
        Ok(())
    }

    /// Canonical identifier registered for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.keys.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Number of registered key strings, variants included.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
