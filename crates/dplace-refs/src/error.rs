//! Error types for citation resolution.

use dplace_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, SourceSnippet};
use std::fmt;

/// Result type alias for dplace-refs operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building the index or resolving citations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A key survived every correction stage but is not in the bibliography.
    UnresolvedCitation {
        /// The key after corrections and overrides.
        key: String,
        /// The key as it was split out of the field.
        mention: String,
        /// The containing record (society sheet) the field came from.
        record: String,
        /// The reference field as it appeared in the sheet.
        field: String,
    },

    /// Two bibliography entries register the same key string.
    IndexCollision {
        key: String,
        existing: String,
        conflicting: String,
    },

    /// The correction tables are internally inconsistent.
    InvalidTables { origin: String, message: String },

    /// The correction tables could not be parsed.
    TableSyntax { origin: String, message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnresolvedCitation {
                key, record, field, ..
            } => write!(
                f,
                "Unresolved citation '{}' in '{}' (reference field: '{}')",
                key, record, field
            ),
            Error::IndexCollision {
                key,
                existing,
                conflicting,
            } => write!(
                f,
                "Bibliography key '{}' is claimed by both '{}' and '{}'",
                key, existing, conflicting
            ),
            Error::InvalidTables { origin, message } => {
                write!(f, "Invalid correction tables '{}': {}", origin, message)
            }
            Error::TableSyntax { origin, message } => {
                write!(f, "Failed to parse correction tables '{}': {}", origin, message)
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Convert this error to a DiagnosticMessage.
    ///
    /// Reference errors use D-1-* error codes (subsystem 1).
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        match self {
            Error::UnresolvedCitation {
                key,
                mention,
                record,
                field,
            } => {
                let mut builder = DiagnosticMessageBuilder::error("Unresolved Citation")
                    .with_code("D-1-1")
                    .problem(format!("`{}` is not a bibliography key", key))
                    .with_optional_snippet(SourceSnippet::locate(record, field, mention));

                if mention != key {
                    builder = builder.add_info(format!("Corrected from `{}`", mention));
                }

                builder
                    .add_note(format!("Cited in `{}`", record))
                    .add_hint(format!(
                        "Add a correction for `{}`, or exclude it if it is ambiguous?",
                        mention
                    ))
                    .build()
            }

            Error::IndexCollision {
                key,
                existing,
                conflicting,
            } => DiagnosticMessageBuilder::error("Bibliography Key Collision")
                .with_code("D-1-2")
                .problem(format!(
                    "`{}` must identify exactly one bibliography entry",
                    key
                ))
                .add_detail(format!("Registered by `{}`", existing))
                .add_detail(format!("Registered again by `{}`", conflicting))
                .add_hint("Give one of the entries a distinct `key` field?")
                .build(),

            Error::InvalidTables { origin, message } => {
                DiagnosticMessageBuilder::error("Invalid Correction Tables")
                    .with_code("D-1-3")
                    .problem(format!("Correction tables `{}` are inconsistent", origin))
                    .add_detail(message.clone())
                    .build()
            }

            Error::TableSyntax { origin, message } => {
                DiagnosticMessageBuilder::error("Correction Table Syntax Error")
                    .with_code("D-1-4")
                    .problem(format!("Failed to parse `{}`", origin))
                    .add_detail(message.clone())
                    .build()
            }
        }
    }
}
