//! Resolving citation mentions to canonical bibliography identifiers.

use std::fmt;

use crate::corrections::CorrectionTables;
use crate::error::{Error, Result};
use crate::index::BibliographyIndex;
use crate::observer::{NoopObserver, ResolutionObserver};
use crate::split::{CitationMention, split};

/// A canonical identifier with an optional locator.
///
/// Displays as `id` or `id[locator]`, the form value tables store in their
/// source column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedSource {
    pub id: String,
    pub locator: Option<String>,
}

impl ResolvedSource {
    /// Create a source, normalizing the locator: surrounding whitespace is
    /// stripped, `;` becomes `,`, and a blank locator is dropped.
    pub fn new(id: impl Into<String>, locator: Option<&str>) -> Self {
        let locator = locator
            .map(|l| l.trim().replace(';', ","))
            .filter(|l| !l.is_empty());
        Self {
            id: id.into(),
            locator,
        }
    }
}

impl fmt::Display for ResolvedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.locator {
            Some(locator) => write!(f, "{}[{}]", self.id, locator),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Outcome of resolving one mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedSource),
    /// The corrected key is in the exclusion set.
    Dropped { key: String },
}

/// Resolves mentions against one bibliography with one set of tables.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    tables: &'a CorrectionTables,
    index: &'a BibliographyIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(tables: &'a CorrectionTables, index: &'a BibliographyIndex) -> Self {
        Self { tables, index }
    }

    pub fn tables(&self) -> &'a CorrectionTables {
        self.tables
    }

    pub fn index(&self) -> &'a BibliographyIndex {
        self.index
    }

    /// Resolve one mention cited by `record`.
    ///
    /// `field` is the reference field the mention was split from; it is
    /// only used to report an unresolved key.
    pub fn resolve(
        &self,
        mention: &CitationMention,
        record: &str,
        field: &str,
    ) -> Result<Resolution> {
        self.resolve_observed(mention, record, field, &mut NoopObserver)
    }

    /// [`resolve`](Self::resolve), reporting each stage to `observer`.
    pub fn resolve_observed(
        &self,
        mention: &CitationMention,
        record: &str,
        field: &str,
        observer: &mut dyn ResolutionObserver,
    ) -> Result<Resolution> {
        let mut key = mention.key.as_str();
        let mut locator = mention.locator.clone();

        if let Some(rule) = self.tables.correction(key) {
            observer.on_corrected(key, rule.key(), record);
            if let Some(injected) = rule.locator() {
                locator = Some(match locator {
                    Some(existing) => format!("{} {}", injected, existing),
                    None => injected.to_string(),
                });
            }
            key = rule.key();
        }

        if let Some(replacement) = self.tables.override_for(key, record) {
            observer.on_overridden(key, replacement, record);
            key = replacement;
        }

        if self.tables.is_excluded(key) {
            observer.on_dropped(key, record);
            return Ok(Resolution::Dropped {
                key: key.to_string(),
            });
        }

        let id = self
            .index
            .get(key)
            .ok_or_else(|| Error::UnresolvedCitation {
                key: key.to_string(),
                mention: mention.key.clone(),
                record: record.to_string(),
                field: field.to_string(),
            })?;

        let source = ResolvedSource::new(id, locator.as_deref());
        observer.on_resolved(&source, record);
        Ok(Resolution::Resolved(source))
    }

    /// Resolve every mention in a raw reference field, in order.
    ///
    /// Applies the whole-field substitutions, splits, and resolves each
    /// mention. Excluded mentions are left out. The first unresolved key
    /// aborts the field.
    pub fn resolve_field(
        &self,
        field: &str,
        record: &str,
        observer: &mut dyn ResolutionObserver,
    ) -> Result<Vec<ResolvedSource>> {
        let substituted = self.tables.substitute(field);

        let mut sources = Vec::new();
        for mention in split(&substituted) {
            observer.on_mention(&mention, record);
            match self.resolve_observed(&mention, record, field, observer)? {
                Resolution::Resolved(source) => sources.push(source),
                Resolution::Dropped { .. } => {}
            }
        }
        Ok(sources)
    }
}
