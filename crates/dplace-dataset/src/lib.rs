//! The Carneiro 6th edition converter.
//!
//! Reads a raw export (society bibliography, society list, trait list and
//! one trait sheet per society), resolves the reference field of every
//! trait value with [`dplace_refs`], and writes the resulting tables.
//!
//! ```no_run
//! use dplace_dataset::{RawDataset, build, write_dataset};
//! use dplace_refs::{CorrectionTables, TracingObserver};
//!
//! let raw = RawDataset::from_raw_dir("raw");
//! let dataset = build(&raw, &CorrectionTables::carneiro6(), &mut TracingObserver)?;
//! write_dataset(&dataset, "cldf".as_ref())?;
//! # Ok::<(), dplace_dataset::DatasetError>(())
//! ```

pub mod bib;
pub mod build;
pub mod cldf;
pub mod error;
pub mod raw;
pub mod writer;

pub use bib::{BibEntry, SocietySources, bibliography_records, parse_entries, parse_society_bibliography};
pub use build::build;
pub use cldf::{Code, Dataset, Parameter, Society, Value, mkid};
pub use error::{DatasetError, Result};
pub use raw::{RawDataset, SheetRow, SocietyRow, TraitRow, TraitSheet};
pub use writer::write_dataset;
