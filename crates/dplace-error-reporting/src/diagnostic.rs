//! Core diagnostic message types.
//!
//! This module defines the structures for representing diagnostic messages
//! (errors, warnings, info) following tidyverse-style guidelines.

use std::fmt::Write;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// An error that prevents completion
    Error,
    /// A warning that doesn't prevent completion but indicates a problem
    Warning,
    /// Informational message
    Info,
}

impl DiagnosticKind {
    fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
            DiagnosticKind::Info => "Info",
        }
    }
}

/// How detail items should be presented (tidyverse x/i bullet style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailKind {
    /// Error detail (✖ bullet)
    Error,
    /// Info detail (ℹ bullet)
    Info,
    /// Note detail (plain bullet)
    Note,
}

impl DetailKind {
    fn bullet(self) -> &'static str {
        match self {
            DetailKind::Error => "✖",
            DetailKind::Info => "ℹ",
            DetailKind::Note => "•",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            DetailKind::Error => "error",
            DetailKind::Info => "info",
            DetailKind::Note => "note",
        }
    }
}

/// The content of a message or detail item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageContent {
    /// Plain text content
    Plain(String),
    /// Markdown content, backticks mark keys and identifiers
    Markdown(String),
}

impl MessageContent {
    /// Get the raw string content for display
    pub fn as_str(&self) -> &str {
        match self {
            MessageContent::Plain(s) => s,
            MessageContent::Markdown(s) => s,
        }
    }

    /// Convert to JSON value with type information
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        match self {
            MessageContent::Plain(s) => json!({ "type": "plain", "content": s }),
            MessageContent::Markdown(s) => json!({ "type": "markdown", "content": s }),
        }
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Markdown(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Markdown(s.to_string())
    }
}

/// A piece of input text a diagnostic points into.
///
/// Reference fields are short single-line strings pulled out of a
/// spreadsheet cell, so the snippet carries its own text rather than
/// pointing into a file on disk. `origin` names where the text came from
/// (a sheet name, a file path) and is used as the ariadne source id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSnippet {
    pub origin: String,
    pub text: String,
    /// Byte range into `text`.
    pub range: Range<usize>,
}

impl SourceSnippet {
    pub fn new(origin: impl Into<String>, text: impl Into<String>, range: Range<usize>) -> Self {
        Self {
            origin: origin.into(),
            text: text.into(),
            range,
        }
    }

    /// Locate `needle` inside `text` and point at its first occurrence.
    ///
    /// Returns `None` when `needle` does not occur verbatim (for example
    /// after Unicode normalization changed its byte representation).
    pub fn locate(origin: impl Into<String>, text: &str, needle: &str) -> Option<Self> {
        if needle.is_empty() {
            return None;
        }
        let start = text.find(needle)?;
        Some(Self::new(origin, text, start..start + needle.len()))
    }

    /// Character offsets of `range`, as ariadne counts them.
    fn char_range(&self) -> Range<usize> {
        let clamp = |offset: usize| {
            let offset = offset.min(self.text.len());
            self.text
                .char_indices()
                .take_while(|(i, _)| *i < offset)
                .count()
        };
        clamp(self.range.start)..clamp(self.range.end)
    }
}

/// A detail item in a diagnostic message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailItem {
    pub kind: DetailKind,
    pub content: MessageContent,
}

/// A diagnostic message following tidyverse-style structure.
///
/// Structure:
/// 1. **Code**: Optional error code (e.g., "D-1-1") for searchability
/// 2. **Title**: Brief error message
/// 3. **Kind**: Error, Warning, Info
/// 4. **Problem**: What went wrong (the "must" or "can't" statement)
/// 5. **Details**: Specific information (bulleted)
/// 6. **Hints**: Optional guidance for fixing (ends with ?)
/// 7. **Snippet**: Optional source text with the offending range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    pub title: String,

    pub kind: DiagnosticKind,

    pub problem: Option<MessageContent>,

    pub details: Vec<DetailItem>,

    pub hints: Vec<MessageContent>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<SourceSnippet>,
}

impl DiagnosticMessage {
    /// Create a new diagnostic message with just a title and kind.
    ///
    /// Consider [`DiagnosticMessageBuilder`](crate::DiagnosticMessageBuilder) for anything richer.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            kind,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            snippet: None,
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

    /// Set the error code.
    ///
    /// Error codes follow the format `D-<subsystem>-<number>` (e.g., "D-1-1").
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// The catalog subsystem of this diagnostic's code, if it has one.
    pub fn subsystem(&self) -> Option<&str> {
        self.code
            .as_deref()
            .and_then(crate::catalog::get_subsystem)
    }

    /// Render this diagnostic message as text.
    ///
    /// Without a snippet the output reads:
    /// ```text
    /// Error [D-1-1]: title
    /// Problem statement here
    /// ✖ Error detail
    /// ℹ Info detail
    /// ? Hint
    /// ```
    /// With a snippet, ariadne renders the title, code, problem and the
    /// labelled source text, and the bullets follow underneath.
    pub fn to_text(&self) -> String {
        let mut result = String::new();

        match self.snippet.as_ref().and_then(|s| self.render_snippet(s)) {
            Some(rendered) => result.push_str(&rendered),
            None => {
                match &self.code {
                    Some(code) => {
                        writeln!(result, "{} [{}]: {}", self.kind.label(), code, self.title)
                    }
                    None => writeln!(result, "{}: {}", self.kind.label(), self.title),
                }
                .ok();
                if let Some(problem) = &self.problem {
                    writeln!(result, "{}", problem.as_str()).ok();
                }
            }
        }

        for detail in &self.details {
            writeln!(result, "{} {}", detail.kind.bullet(), detail.content.as_str()).ok();
        }
        for hint in &self.hints {
            writeln!(result, "? {}", hint.as_str()).ok();
        }

        result.trim_end().to_string()
    }

    /// Render this diagnostic message as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut obj = json!({
            "kind": self.kind.label().to_lowercase(),
            "title": self.title,
        });

        if let Some(code) = &self.code {
            obj["code"] = json!(code);
        }
        if let Some(problem) = &self.problem {
            obj["problem"] = problem.to_json();
        }
        if !self.details.is_empty() {
            let details: Vec<_> = self
                .details
                .iter()
                .map(|d| json!({ "kind": d.kind.as_str(), "content": d.content.to_json() }))
                .collect();
            obj["details"] = json!(details);
        }
        if !self.hints.is_empty() {
            let hints: Vec<_> = self.hints.iter().map(MessageContent::to_json).collect();
            obj["hints"] = json!(hints);
        }
        if let Some(snippet) = &self.snippet {
            obj["snippet"] = json!(snippet);
        }

        obj
    }

    fn render_snippet(&self, snippet: &SourceSnippet) -> Option<String> {
        use ariadne::{Config, Label, Report, ReportKind, Source};

        let report_kind = match self.kind {
            DiagnosticKind::Error => ReportKind::Error,
            DiagnosticKind::Warning => ReportKind::Warning,
            DiagnosticKind::Info => ReportKind::Advice,
        };

        let span = snippet.char_range();
        let mut report = Report::build(report_kind, snippet.origin.clone(), span.start)
            .with_config(Config::default().with_color(false));

        report = match &self.code {
            Some(code) => report.with_message(format!("[{}] {}", code, self.title)),
            None => report.with_message(&self.title),
        };

        let label = self
            .problem
            .as_ref()
            .map_or(self.title.as_str(), MessageContent::as_str);
        report = report.with_label(Label::new((snippet.origin.clone(), span)).with_message(label));

        let mut output = Vec::new();
        report
            .finish()
            .write(
                (snippet.origin.clone(), Source::from(snippet.text.as_str())),
                &mut output,
            )
            .ok()?;

        String::from_utf8(output).ok()
    }
}
