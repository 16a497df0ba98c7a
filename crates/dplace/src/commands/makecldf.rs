//! Makecldf command implementation.
//!
//! Converts `<raw>/6TH_EDITION/` into the value tables under `<out>`.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use dplace_dataset::{RawDataset, build, write_dataset};
use dplace_refs::{KeyFrequency, TracingObserver};

use super::load_tables;

/// Arguments for the makecldf command
#[derive(Debug)]
pub struct MakecldfArgs {
    /// Raw data directory
    pub raw: PathBuf,
    /// Output directory
    pub out: PathBuf,
    /// Correction tables replacing the built-in ones
    pub tables: Option<PathBuf>,
    /// Number of most frequent raw keys to print
    pub ref_stats: Option<usize>,
}

/// Execute the makecldf command
pub fn execute(args: MakecldfArgs) -> Result<()> {
    let tables = load_tables(args.tables.as_deref())?;
    let raw = RawDataset::from_raw_dir(&args.raw);
    info!(raw = %raw.dir().display(), "Reading raw export");

    let mut observer = (TracingObserver, KeyFrequency::new());
    let dataset = build(&raw, &tables, &mut observer)?;
    write_dataset(&dataset, &args.out)?;

    if let Some(n) = args.ref_stats {
        let (_, freq) = &observer;
        println!("{} citations of {} distinct keys", freq.total(), freq.distinct());
        for (key, count) in freq.most_common(n) {
            println!("{:>6}  {}", count, key);
        }
    }
    Ok(())
}
