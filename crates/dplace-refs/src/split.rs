//! Splitting reference fields into citation mentions.
//!
//! A reference field is a `;`-separated list of mentions in the form
//! `Author Year[ (Vol. N)][: pages]` or `Author Year passim`. Page lists
//! may themselves contain `;` (`"Smith 1925: 10;15,20"`), so a segment
//! that starts with a digit continues the previous mention.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Locator marking a work cited throughout rather than at specific pages.
pub const PASSIM: &str = "passim";

/// `(Vol. 5)`, `(vol 2)`, `(V. II)`, with any whitespace in front of it.
static VOLUME_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*(?P<vol>\((?:(?i:vol)\.?|[Vv]\.)\s*(?:[0-9]+|(?i:[ivxlc]+))\))")
        .expect("volume marker pattern is valid")
});

/// One citation unit extracted from a reference field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CitationMention {
    /// Author-year text, NFC-normalized.
    pub key: String,
    /// Page range, volume marker, both (`"(Vol. 5): 200"`) or [`PASSIM`].
    pub locator: Option<String>,
}

impl CitationMention {
    pub fn new(key: impl Into<String>, locator: Option<String>) -> Self {
        Self {
            key: key.into(),
            locator,
        }
    }
}

/// Split `field` on `;`, folding digit-leading segments into the
/// preceding chunk.
///
/// The chunks are returned unstripped, so `chunks.join(";") == field`.
///
/// ```
/// use dplace_refs::merge_continuations;
///
/// let chunks = merge_continuations("Smith 1925: 10;15,20; Jones 1930");
/// assert_eq!(chunks, ["Smith 1925: 10;15,20", " Jones 1930"]);
/// ```
pub fn merge_continuations(field: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut chunk_start = 0;
    let mut chunk_is_blank = true;
    let mut offset = 0;

    for (i, segment) in field.split(';').enumerate() {
        let segment_start = offset;
        offset += segment.len() + 1;

        if i == 0 {
            chunk_is_blank = segment.trim().is_empty();
            continue;
        }
        if !chunk_is_blank && starts_with_digit(segment) {
            continue;
        }

        // `segment_start - 1` is the `;` separating the two chunks.
        chunks.push(&field[chunk_start..segment_start - 1]);
        chunk_start = segment_start;
        chunk_is_blank = segment.trim().is_empty();
    }
    chunks.push(&field[chunk_start..]);

    chunks
}

/// Split a reference field into citation mentions.
///
/// Total over its input: anything that does not look like a volume
/// marker or a page separator stays part of the key, and blank chunks
/// are dropped.
///
/// ```
/// use dplace_refs::{split, CitationMention};
///
/// assert_eq!(
///     split("Frank 1959 (Vol. 5): 200"),
///     [CitationMention::new("Frank 1959", Some("(Vol. 5): 200".into()))]
/// );
/// ```
pub fn split(field: &str) -> Vec<CitationMention> {
    merge_continuations(field)
        .into_iter()
        .filter_map(parse_mention)
        .collect()
}

fn parse_mention(chunk: &str) -> Option<CitationMention> {
    let chunk = chunk.trim();
    if chunk.is_empty() {
        return None;
    }

    if !chunk.contains(':') {
        if let Some(key) = chunk.strip_suffix(" passim") {
            return Some(CitationMention::new(nfc(key), Some(PASSIM.to_string())));
        }
    }

    let volume = VOLUME_MARKER
        .captures(chunk)
        .map(|captures| captures["vol"].to_string());
    let rest = match volume {
        Some(_) => VOLUME_MARKER.replace_all(chunk, ""),
        None => Cow::Borrowed(chunk),
    };

    let (key, pages) = match rest.split_once(':') {
        Some((key, pages)) => (key, pages.trim()),
        None => (rest.as_ref(), ""),
    };

    let locator = match (volume, pages.is_empty()) {
        (Some(volume), false) => Some(format!("{}: {}", volume, pages)),
        (None, false) => Some(pages.to_string()),
        (volume, true) => volume,
    };

    Some(CitationMention::new(nfc(key), locator))
}

fn starts_with_digit(segment: &str) -> bool {
    segment
        .trim_start()
        .starts_with(|c: char| c.is_ascii_digit())
}

fn nfc(key: &str) -> String {
    key.trim().nfc().collect()
}
