//! The relational tables the converter produces.

use dplace_refs::ResolvedSource;

use crate::bib::{BibEntry, DATASET_PREFIX};

/// Dataset-scoped identifier for a raw local id, e.g. `CARNEIRO6_12`.
pub fn mkid(local: &str) -> String {
    format!("{}_{}", DATASET_PREFIX, local)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Society {
    pub id: String,
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    pub glottocode: String,
    pub name_and_id_in_source: String,
    pub xd_id: String,
    pub focal_year: Option<i32>,
    pub hraf_name_id: String,
    pub hraf_id: String,
    pub region: String,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Vec<String>,
}

impl Parameter {
    /// Every trait is a presence/absence variable.
    pub const DATATYPE: &'static str = "Categorical";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    pub id: String,
    pub var_id: String,
    pub name: String,
    pub description: String,
    pub ord: u8,
}

impl Code {
    /// The `absent` and `present` codes of a parameter.
    pub fn presence_codes(var_id: &str) -> [Code; 2] {
        [("absent", 0), ("present", 1)].map(|(desc, ord)| Code {
            id: format!("{}-{}", var_id, ord),
            var_id: var_id.to_string(),
            name: desc.to_string(),
            description: desc.to_string(),
            ord,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub id: String,
    pub var_id: String,
    pub code_id: String,
    pub soc_id: String,
    pub value: String,
    pub comment: String,
    pub source: Vec<ResolvedSource>,
    pub admin_comment: String,
    pub year: Option<i32>,
}

/// Everything the converter writes.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub societies: Vec<Society>,
    pub parameters: Vec<Parameter>,
    pub codes: Vec<Code>,
    pub values: Vec<Value>,
    /// Bibliography entries, one per entry id, in first-seen order.
    pub sources: Vec<BibEntry>,
    /// Correction targets that are not bibliography keys.
    pub unreachable_targets: Vec<String>,
}
