//! Error types for reading the raw dataset and writing the tables.

use std::path::PathBuf;

use dplace_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};
use thiserror::Error;

/// Result type alias for dplace-dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed bibliography at line {line}: {message}")]
    Bibliography { line: usize, message: String },

    #[error("Society '{society}' from {context} is not in the society list")]
    UnknownSociety { society: String, context: String },

    #[error("Missing {column} in {context}")]
    MissingValue { column: String, context: String },

    #[error("Invalid focal year '{value}' for society '{society}'")]
    InvalidFocalYear { society: String, value: String },

    #[error(transparent)]
    References(#[from] dplace_refs::Error),
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Convert this error to a DiagnosticMessage.
    ///
    /// Dataset errors use D-2-* error codes (subsystem 2); reference
    /// errors keep their own D-1-* diagnostics.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        match self {
            DatasetError::References(e) => e.to_diagnostic(),

            DatasetError::Io { path, source } => DiagnosticMessageBuilder::error("I/O Error")
                .with_code("D-2-1")
                .problem(format!("Failed to access `{}`", path.display()))
                .add_detail(source.to_string())
                .build(),

            DatasetError::Csv { path, source } => DiagnosticMessageBuilder::error("CSV Error")
                .with_code("D-2-2")
                .problem(format!("Failed to process `{}`", path.display()))
                .add_detail(source.to_string())
                .build(),

            DatasetError::Bibliography { line, message } => {
                DiagnosticMessageBuilder::error("Malformed Bibliography")
                    .with_code("D-2-3")
                    .problem(format!("The society bibliography is malformed at line {}", line))
                    .add_detail(message.clone())
                    .build()
            }

            DatasetError::UnknownSociety { society, context } => {
                DiagnosticMessageBuilder::error("Unknown Society")
                    .with_code("D-2-4")
                    .problem(format!("`{}` is not in the society list", society))
                    .add_info(format!("Referenced from {}", context))
                    .build()
            }

            DatasetError::MissingValue { column, context } => {
                DiagnosticMessageBuilder::error("Missing Value")
                    .with_code("D-2-5")
                    .problem(format!("`{}` must not be empty", column))
                    .add_info(format!("In {}", context))
                    .build()
            }

            DatasetError::InvalidFocalYear { society, value } => {
                DiagnosticMessageBuilder::error("Invalid Focal Year")
                    .with_code("D-2-6")
                    .problem(format!("The focal year of `{}` must be an integer", society))
                    .add_detail(format!("Found `{}`", value))
                    .build()
            }
        }
    }
}
