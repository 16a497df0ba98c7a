//! Check command implementation.
//!
//! Resolves every reference field of a raw export and reports correction
//! targets missing from its bibliography, without writing any tables.

use std::path::Path;

use anyhow::Result;

use dplace_dataset::{RawDataset, build};
use dplace_refs::NoopObserver;

use super::load_tables;

/// Execute the check command
pub fn execute(raw: &Path, tables: Option<&Path>) -> Result<()> {
    let tables = load_tables(tables)?;
    let raw = RawDataset::from_raw_dir(raw);

    let dataset = build(&raw, &tables, &mut NoopObserver)?;
    for target in &dataset.unreachable_targets {
        println!("unreachable correction target: {}", target);
    }
    let citations: usize = dataset.values.iter().map(|v| v.source.len()).sum();
    println!(
        "{} values, {} citations, {} sources",
        dataset.values.len(),
        citations,
        dataset.sources.len()
    );
    Ok(())
}
