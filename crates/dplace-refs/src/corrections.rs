//! Correction tables for citation keys.
//!
//! The sheets contain misspelled authors, wrong years, and author-year
//! keys that mean different entries in different society sheets. Those
//! fixes are data, kept in a TOML file next to the dataset rather than in
//! the resolver:
//!
//! ```toml
//! exclusions = ["Anonymous 1900"]
//!
//! [[substitutions]]
//! from = "Frank 1959; Vol. 5; 200"
//! to = "Frank 1959, Vol. 5: 200"
//!
//! [corrections]
//! "Roth 1980" = "Roth 1890"
//! "Morgan 1901, Vol. 1" = { key = "Morgan (1901)", locator = "Vol. 1" }
//!
//! [[overrides]]
//! key = "Smith 1925"
//! record = "CARNEIRO6_018_Ao_Naga.Sheet1"
//! replacement = "Smith (1925b)"
//! ```

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::index::BibliographyIndex;

/// Tables for the Carneiro 6th edition trait sheets.
const CARNEIRO6_TABLES: &str = include_str!("../tables/carneiro6.toml");

/// What a misspelled or variant key is corrected to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CorrectionRule {
    /// Replace the key.
    Key(String),
    /// Replace the key and prepend `locator` to the mention's locator.
    WithLocator { key: String, locator: String },
}

impl CorrectionRule {
    pub fn key(&self) -> &str {
        match self {
            CorrectionRule::Key(key) => key,
            CorrectionRule::WithLocator { key, .. } => key,
        }
    }

    pub fn locator(&self) -> Option<&str> {
        match self {
            CorrectionRule::Key(_) => None,
            CorrectionRule::WithLocator { locator, .. } => Some(locator),
        }
    }

    fn normalized(self) -> Self {
        match self {
            CorrectionRule::Key(key) => CorrectionRule::Key(nfc(&key)),
            CorrectionRule::WithLocator { key, locator } => CorrectionRule::WithLocator {
                key: nfc(&key),
                locator,
            },
        }
    }
}

/// A whole-field replacement applied before splitting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Override {
    key: String,
    record: String,
    replacement: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TablesFile {
    #[serde(default)]
    exclusions: Vec<String>,
    #[serde(default)]
    substitutions: Vec<Substitution>,
    #[serde(default)]
    corrections: IndexMap<String, CorrectionRule>,
    #[serde(default)]
    overrides: Vec<Override>,
}

/// Immutable correction configuration, loaded once per run.
///
/// Keys are NFC-normalized on load, matching what the splitter emits.
#[derive(Debug, Clone, Default)]
pub struct CorrectionTables {
    substitutions: Vec<Substitution>,
    corrections: IndexMap<String, CorrectionRule>,
    overrides: HashMap<(String, String), String>,
    exclusions: BTreeSet<String>,
}

impl CorrectionTables {
    /// The tables shipped for the Carneiro 6th edition.
    ///
    /// # Panics
    ///
    /// Panics if the embedded `tables/carneiro6.toml` is invalid, which the
    /// crate's tests rule out.
    pub fn carneiro6() -> Self {
        Self::from_toml_str("carneiro6.toml", CARNEIRO6_TABLES)
            .expect("embedded carneiro6 correction tables are valid")
    }

    /// Parse and validate tables from TOML text.
    ///
    /// `origin` names the source in error messages.
    pub fn from_toml_str(origin: &str, text: &str) -> Result<Self> {
        let file: TablesFile = toml::from_str(text).map_err(|e| Error::TableSyntax {
            origin: origin.to_string(),
            message: e.message().to_string(),
        })?;
        Self::from_file(origin, file)
    }

    fn from_file(origin: &str, file: TablesFile) -> Result<Self> {
        let invalid = |message: String| Error::InvalidTables {
            origin: origin.to_string(),
            message,
        };

        let mut corrections = IndexMap::with_capacity(file.corrections.len());
        for (key, rule) in file.corrections {
            let rule = rule.normalized();
            if key.trim().is_empty() || rule.key().trim().is_empty() {
                return Err(invalid("corrections must not have empty keys".to_string()));
            }
            corrections.insert(nfc(&key), rule);
        }

        let mut overrides = HashMap::with_capacity(file.overrides.len());
        for entry in file.overrides {
            if entry.key.trim().is_empty() || entry.replacement.trim().is_empty() {
                return Err(invalid("overrides must not have empty keys".to_string()));
            }
            let pair = (nfc(&entry.key), entry.record);
            if overrides.contains_key(&pair) {
                return Err(invalid(format!(
                    "'{}' is overridden twice for '{}'",
                    pair.0, pair.1
                )));
            }
            overrides.insert(pair, nfc(&entry.replacement));
        }

        let mut exclusions = BTreeSet::new();
        for key in file.exclusions {
            let key = nfc(&key);
            if key.trim().is_empty() {
                return Err(invalid("exclusions must not be empty".to_string()));
            }
            if corrections.contains_key(&key) {
                return Err(invalid(format!(
                    "'{}' is both excluded and corrected; exclusions apply to corrected keys",
                    key
                )));
            }
            exclusions.insert(key);
        }

        Ok(Self {
            substitutions: file.substitutions,
            corrections,
            overrides,
            exclusions,
        })
    }

    /// Apply the whole-field substitutions to a raw reference field.
    pub fn substitute<'a>(&self, field: &'a str) -> Cow<'a, str> {
        let mut field = Cow::Borrowed(field);
        for substitution in &self.substitutions {
            if field == substitution.from.as_str() {
                field = Cow::Owned(substitution.to.clone());
            }
        }
        field
    }

    /// Exact-match correction for a mention key.
    pub fn correction(&self, key: &str) -> Option<&CorrectionRule> {
        self.corrections.get(key)
    }

    /// Replacement for `key` when cited from `record`.
    pub fn override_for(&self, key: &str, record: &str) -> Option<&str> {
        self.overrides
            .get(&(key.to_string(), record.to_string()))
            .map(String::as_str)
    }

    pub fn is_excluded(&self, key: &str) -> bool {
        self.exclusions.contains(key)
    }

    /// Correction and override targets that `index` does not know.
    ///
    /// Excluded targets are not reported. The result is sorted.
    pub fn unreachable_targets(&self, index: &BibliographyIndex) -> Vec<&str> {
        let targets: BTreeSet<&str> = self
            .corrections
            .values()
            .map(CorrectionRule::key)
            .chain(self.overrides.values().map(String::as_str))
            .filter(|target| !self.is_excluded(target) && !index.contains(target))
            .collect();
        targets.into_iter().collect()
    }

    pub fn corrections(&self) -> impl Iterator<Item = (&str, &CorrectionRule)> {
        self.corrections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn exclusions(&self) -> impl Iterator<Item = &str> {
        self.exclusions.iter().map(String::as_str)
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    pub fn substitution_count(&self) -> usize {
        self.substitutions.len()
    }
}

fn nfc(s: &str) -> String {
    s.nfc().collect()
}
