//! The society bibliography.
//!
//! One BibTeX file holds the sources of every society. A line such as
//! `CARNEIRO6_018_Ao_Naga` heads the entries of one society; everything up
//! to the next heading belongs to it. Each entry carries a `key` field with
//! the citation key the trait sheets use, e.g. `key = {Smith (1925b)}`.

use biblatex::{Bibliography, ChunksExt, Entry};
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use dplace_refs::BibliographyRecord;

use crate::error::{DatasetError, Result};

/// Prefix of society headings and of every identifier this dataset mints.
pub const DATASET_PREFIX: &str = "CARNEIRO6";

static SOCIETY_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^CARNEIRO6_[0-9]{3}_").expect("society heading pattern is valid"));

/// A parsed bibliography entry.
#[derive(Debug, Clone)]
pub struct BibEntry {
    /// Entry id; the canonical identifier of the source.
    pub id: String,
    entry: Entry,
}

impl BibEntry {
    fn new(entry: Entry) -> Self {
        Self {
            id: entry.key.clone(),
            entry,
        }
    }

    /// A field value as plain text, whitespace runs collapsed and
    /// `@string` abbreviations expanded.
    pub fn field(&self, name: &str) -> Option<String> {
        self.entry
            .get(name)
            .map(|chunks| collapse_whitespace(&chunks.format_verbatim()))
    }

    /// The citation key the trait sheets use for this entry.
    pub fn citation_key(&self) -> Option<String> {
        self.field("key").filter(|key| !key.is_empty())
    }

    /// Serialize back to `.bib` syntax.
    pub fn to_bibtex(&self) -> String {
        self.entry.to_biblatex_string()
    }
}

/// The entries listed under one society heading.
#[derive(Debug, Clone)]
pub struct SocietySources {
    /// Society id, the first two `_`-separated parts of the heading.
    pub society: String,
    pub entries: Vec<BibEntry>,
}

/// Split the society bibliography into per-society chunks and parse them.
///
/// Chunk text is NFC-normalized before parsing.
pub fn parse_society_bibliography(text: &str) -> Result<Vec<SocietySources>> {
    let mut chunks: Vec<(String, usize, String)> = Vec::new();
    let mut current: Option<(String, usize, String)> = None;

    for (i, line) in text.split('\n').enumerate() {
        let line_number = i + 1;
        if line.starts_with(DATASET_PREFIX) {
            if !SOCIETY_HEADING.is_match(line) {
                return Err(DatasetError::Bibliography {
                    line: line_number,
                    message: format!("'{}' is not a society heading", line.trim()),
                });
            }
            if let Some(chunk) = current.take() {
                chunks.push(chunk);
            }
            let society = line.trim().split('_').take(2).collect::<Vec<_>>().join("_");
            current = Some((society, line_number + 1, String::new()));
        } else {
            match current.as_mut() {
                Some((_, _, chunk)) => {
                    chunk.push_str(line);
                    chunk.push('\n');
                }
                None if line.trim().is_empty() => {}
                None => {
                    return Err(DatasetError::Bibliography {
                        line: line_number,
                        message: "entries must follow a society heading".to_string(),
                    });
                }
            }
        }
    }
    chunks.extend(current);

    if chunks.is_empty() {
        return Err(DatasetError::Bibliography {
            line: 1,
            message: "no society headings found".to_string(),
        });
    }

    chunks
        .into_iter()
        .map(|(society, first_line, chunk)| {
            let chunk: String = chunk.nfc().collect();
            let entries = parse_entries(&chunk).map_err(|e| match e {
                DatasetError::Bibliography { line, message } => DatasetError::Bibliography {
                    line: first_line + line - 1,
                    message,
                },
                other => other,
            })?;
            Ok(SocietySources { society, entries })
        })
        .collect()
}

/// Bibliography records for index construction, one per entry.
///
/// Fails if an entry has no `key` field.
pub fn bibliography_records(sources: &[SocietySources]) -> Result<Vec<BibliographyRecord>> {
    let mut records = Vec::new();
    for society in sources {
        for entry in &society.entries {
            let key = entry.citation_key().ok_or_else(|| DatasetError::MissingValue {
                column: "key".to_string(),
                context: format!("bibliography entry '{}' of {}", entry.id, society.society),
            })?;
            records.push(BibliographyRecord::new(key, entry.id.clone()));
        }
    }
    Ok(records)
}

/// Parse the BibTeX entries in `text`.
///
/// Text between entries is a comment. Only a line starting with `@` opens
/// an entry, so an address such as `someone@example.org` in a note is not
/// mistaken for one. Line numbers in errors are relative to `text`.
pub fn parse_entries(text: &str) -> Result<Vec<BibEntry>> {
    let masked = mask_free_text(text);
    let bibliography = Bibliography::parse(&masked).map_err(|e| DatasetError::Bibliography {
        line: line_of(&masked, e.span.start),
        message: e.to_string(),
    })?;
    Ok(bibliography.into_iter().map(BibEntry::new).collect())
}

/// Blank out `@` in top-level lines that do not start an entry.
///
/// Replacement is byte-for-byte, so parser offsets still index `text`.
fn mask_free_text(text: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        if depth == 0 && !line.trim_start().starts_with('@') {
            out.push_str(&line.replace('@', " "));
            continue;
        }
        for c in line.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        out.push_str(line);
    }
    out
}

fn line_of(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    text.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
