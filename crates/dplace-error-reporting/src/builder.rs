//! Builder API for diagnostic messages.
//!
//! The builder encodes tidyverse-style structure: a title, a problem
//! statement saying what must or can't happen, bulleted details, and
//! hints phrased as questions.

use crate::diagnostic::{
    DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent, SourceSnippet,
};

/// Builder for [`DiagnosticMessage`].
///
/// # Example
///
/// ```
/// use dplace_error_reporting::DiagnosticMessageBuilder;
///
/// let msg = DiagnosticMessageBuilder::error("Duplicate Override")
///     .with_code("D-1-3")
///     .problem("Each (key, sheet) pair may be overridden once")
///     .add_detail("`Smith 1925` in `CARNEIRO6_018_Ao_Naga.Sheet1` is listed twice")
///     .add_hint("Keep only one of the entries?")
///     .build();
///
/// assert_eq!(msg.code.as_deref(), Some("D-1-3"));
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    message: DiagnosticMessage,
}

impl DiagnosticMessageBuilder {
    fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            message: DiagnosticMessage::new(kind, title),
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.message.code = Some(code.into());
        self
    }

    /// Set the problem statement.
    pub fn problem(mut self, problem: impl Into<MessageContent>) -> Self {
        self.message.problem = Some(problem.into());
        self
    }

    /// Add an error detail (✖).
    pub fn add_detail(self, detail: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Error, detail)
    }

    /// Add an info detail (ℹ).
    pub fn add_info(self, info: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Info, info)
    }

    /// Add a note detail (•).
    pub fn add_note(self, note: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Note, note)
    }

    pub fn add_hint(mut self, hint: impl Into<MessageContent>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn with_snippet(mut self, snippet: SourceSnippet) -> Self {
        self.message.snippet = Some(snippet);
        self
    }

    /// Attach a snippet only when one could be located.
    pub fn with_optional_snippet(mut self, snippet: Option<SourceSnippet>) -> Self {
        self.message.snippet = snippet;
        self
    }

    pub fn build(self) -> DiagnosticMessage {
        self.message
    }

    fn push_detail(mut self, kind: DetailKind, content: impl Into<MessageContent>) -> Self {
        self.message.details.push(DetailItem {
            kind,
            content: content.into(),
        });
        self
    }
}
