//! Command implementations for the dplace CLI
//!
//! Each command module handles the CLI interface and delegates to
//! dplace-dataset and dplace-refs for the actual work.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dplace_refs::CorrectionTables;
use tracing::info;

pub mod check;
pub mod makecldf;
pub mod split;

/// The built-in tables, or the tables in `path` when given.
pub(crate) fn load_tables(path: Option<&Path>) -> Result<CorrectionTables> {
    let Some(path) = path else {
        return Ok(CorrectionTables::carneiro6());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read correction tables '{}'", path.display()))?;
    let tables = CorrectionTables::from_toml_str(&path.display().to_string(), &text)?;
    info!(
        path = %path.display(),
        corrections = tables.corrections().count(),
        overrides = tables.override_count(),
        "Loaded correction tables"
    );
    Ok(tables)
}
