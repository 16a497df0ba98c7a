//! Citation resolution for D-PLACE trait sheets.
//!
//! Every trait value in a society sheet carries a free-text reference
//! field such as `"Smith 1925: 12-14; Jones 1930"`. This crate turns such
//! a field into canonical bibliography identifiers with page locators:
//!
//! ```text
//! "Smith 1925: 12-14; Jones 1930"
//!         │  split
//!         ▼
//! [("Smith 1925", "12-14"), ("Jones 1930", -)]
//!         │  substitutions → corrections → overrides → exclusions
//!         ▼
//! [("Smith (1925b)", "12-14"), ("Jones 1930", -)]
//!         │  bibliography lookup
//!         ▼
//! ["smith1925b[12-14]", "jones1930"]
//! ```
//!
//! Splitting never fails. Resolution fails on the first key that is
//! neither excluded nor present in the bibliography, because a value with
//! a missing or wrong citation must never reach the output.
//!
//! # Example
//!
//! ```
//! use dplace_refs::{BibliographyIndex, BibliographyRecord, CorrectionTables, NoopObserver, Resolver};
//!
//! let index = BibliographyIndex::build([
//!     BibliographyRecord::new("Smith (1925b)", "smith1925b"),
//!     BibliographyRecord::new("Jones 1930", "jones1930"),
//! ])?;
//! let tables = CorrectionTables::carneiro6();
//! let resolver = Resolver::new(&tables, &index);
//!
//! let sources = resolver.resolve_field(
//!     "Smith 1925: 12-14; Jones 1930",
//!     "CARNEIRO6_018_Ao_Naga.Sheet1",
//!     &mut NoopObserver,
//! )?;
//! let sources: Vec<String> = sources.iter().map(ToString::to_string).collect();
//! assert_eq!(sources, ["smith1925b[12-14]", "jones1930"]);
//! # Ok::<(), dplace_refs::Error>(())
//! ```

pub mod corrections;
pub mod error;
pub mod index;
pub mod observer;
pub mod resolve;
pub mod split;

pub use corrections::{CorrectionRule, CorrectionTables, Substitution};
pub use error::{Error, Result};
pub use index::{BibliographyIndex, BibliographyRecord};
pub use observer::{KeyFrequency, NoopObserver, ResolutionObserver, TracingObserver};
pub use resolve::{Resolution, ResolvedSource, Resolver};
pub use split::{CitationMention, PASSIM, merge_continuations, split};
