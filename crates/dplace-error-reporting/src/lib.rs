//! Error reporting and diagnostic messages for D-PLACE dataset builds.
//!
//! Dataset preparation fails loudly: an unresolved citation or a broken
//! bibliography must stop the build, and the maintainer reading the
//! message has to be able to fix the offending table entry without
//! digging through the raw sheets. This crate gives every such failure a
//! common, structured shape:
//!
//! - [`DiagnosticMessage`]: title, error code, problem statement, details and hints
//! - [`DiagnosticMessageBuilder`]: tidyverse-style builder for the above
//! - [`SourceSnippet`]: the text a diagnostic points into (usually one reference field)
//! - [`catalog`]: the embedded error-code catalog (`D-<subsystem>-<number>`)
//!
//! # Example
//!
//! ```
//! use dplace_error_reporting::{DiagnosticMessageBuilder, SourceSnippet};
//!
//! let field = "Smith 1925: 12; Jonse 1930";
//! let msg = DiagnosticMessageBuilder::error("Unresolved Citation")
//!     .with_code("D-1-1")
//!     .problem("`Jonse 1930` is not a known bibliography key")
//!     .with_snippet(SourceSnippet::new("CARNEIRO6_001_Sheet", field, 16..26))
//!     .add_hint("Add a correction for `Jonse 1930`?")
//!     .build();
//!
//! assert!(msg.to_text().contains("Jonse 1930"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info, get_subsystem};
pub use diagnostic::{
    DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent, SourceSnippet,
};
