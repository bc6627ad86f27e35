//! Note ⇄ text codec.
//!
//! A note file is a frontmatter block with fixed keys followed by the body:
//!
//! ```text
//! ---
//! title: Groceries
//! tags: [errands, home]
//! created: 2024-05-01T10:00:00.000Z
//! modified: 2024-05-01T10:05:00.000Z
//! color: default
//! pinned: false
//! archived: false
//! links: []
//! ---
//!
//! milk, eggs
//! ```
//!
//! Decoding never fails. Files without frontmatter are read as freeform
//! markdown: the first `# ` heading becomes the title and hashtags become tags.

use crate::note::{DEFAULT_COLOR, DEFAULT_TITLE, Note};
use crate::parser::{Frontmatter, first_heading, parse_hashtags, quote_if_needed, split_frontmatter};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// How a file's text was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// A frontmatter block was found and parsed.
    Frontmatter,
    /// No frontmatter; title and tags were scraped from the body.
    Freeform,
}

/// A field that could not be parsed and fell back to its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeWarning {
    InvalidTimestamp { key: &'static str, value: String },
    InvalidBool { key: &'static str, value: String },
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::InvalidTimestamp { key, value } => {
                write!(f, "invalid timestamp for '{}': {:?}", key, value)
            }
            DecodeWarning::InvalidBool { key, value } => {
                write!(f, "invalid boolean for '{}': {:?}", key, value)
            }
        }
    }
}

/// Result of [`decode`].
#[derive(Debug, Clone)]
pub struct Decoded {
    pub note: Note,
    pub format: SourceFormat,
    pub warnings: Vec<DecodeWarning>,
}

impl Decoded {
    /// True when the text was not fully understood.
    pub fn is_degraded(&self) -> bool {
        self.format == SourceFormat::Freeform || !self.warnings.is_empty()
    }
}

/// Serialize a note into file text.
pub fn encode(note: &Note) -> String {
    let mut out = String::with_capacity(note.content.len() + 256);

    out.push_str("---\n");
    out.push_str(&format!("title: {}\n", quote_if_needed(&note.title)));
    out.push_str(&format!("tags: {}\n", format_list(&note.tags)));
    out.push_str(&format!("created: {}\n", format_timestamp(&note.created)));
    out.push_str(&format!("modified: {}\n", format_timestamp(&note.modified)));
    out.push_str(&format!("color: {}\n", quote_if_needed(&note.color)));
    out.push_str(&format!("pinned: {}\n", note.is_pinned));
    out.push_str(&format!("archived: {}\n", note.is_archived));
    out.push_str(&format!("links: {}\n", format_list(&note.links)));
    out.push_str("---\n\n");
    out.push_str(&note.content);

    out
}

/// Parse file text into a note stored at `path`.
///
/// The returned note always has a fresh id.
pub fn decode(text: &str, path: &Path) -> Decoded {
    let split = split_frontmatter(text);

    let mut decoded = match split.block {
        Some(block) => decode_frontmatter(block, strip_separator(split.body)),
        None => decode_freeform(text),
    };

    decoded.note.path = Some(path.to_path_buf());
    if decoded.note.modified < decoded.note.created {
        decoded.note.modified = decoded.note.created;
    }
    decoded
}

fn decode_frontmatter(block: &str, body: &str) -> Decoded {
    let fm = Frontmatter::parse(block);
    let title = fm.scalar("title").unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let mut note = Note::new(title, body);
    let mut warnings = Vec::new();

    if let Some(tags) = fm.get("tags") {
        note.tags = tags.to_list().into_iter().collect();
    }
    if let Some(links) = fm.get("links") {
        note.links = links.to_list().into_iter().collect();
    }
    note.color = fm
        .scalar("color")
        .unwrap_or_else(|| DEFAULT_COLOR.to_string());

    if let Some(ts) = timestamp_field(&fm, "created", &mut warnings) {
        note.created = ts;
    }
    if let Some(ts) = timestamp_field(&fm, "modified", &mut warnings) {
        note.modified = ts;
    }
    if let Some(flag) = bool_field(&fm, "pinned", &mut warnings) {
        note.is_pinned = flag;
    }
    if let Some(flag) = bool_field(&fm, "archived", &mut warnings) {
        note.is_archived = flag;
    }

    Decoded {
        note,
        format: SourceFormat::Frontmatter,
        warnings,
    }
}

fn decode_freeform(text: &str) -> Decoded {
    let mut note = Note::new(first_heading(text).unwrap_or(DEFAULT_TITLE), text);
    note.tags = parse_hashtags(text).into_iter().collect::<BTreeSet<_>>();

    Decoded {
        note,
        format: SourceFormat::Freeform,
        warnings: Vec::new(),
    }
}

fn timestamp_field(
    fm: &Frontmatter,
    key: &'static str,
    warnings: &mut Vec<DecodeWarning>,
) -> Option<DateTime<Utc>> {
    let raw = fm.scalar(key)?;
    let parsed = parse_timestamp(&raw);
    if parsed.is_none() {
        warnings.push(DecodeWarning::InvalidTimestamp { key, value: raw });
    }
    parsed
}

fn bool_field(fm: &Frontmatter, key: &'static str, warnings: &mut Vec<DecodeWarning>) -> Option<bool> {
    let raw = fm.scalar(key)?;
    let parsed = if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    };
    if parsed.is_none() {
        warnings.push(DecodeWarning::InvalidBool { key, value: raw });
    }
    parsed
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 with an offset, a naive date-time (taken as UTC), or a
/// plain date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// RFC 3339 in UTC with millisecond precision.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn format_list(items: &BTreeSet<String>) -> String {
    let joined: Vec<_> = items.iter().map(|item| quote_if_needed(item)).collect();
    format!("[{}]", joined.join(", "))
}

/// Drop the blank line written between the closing `---` and the body.
fn strip_separator(body: &str) -> &str {
    body.strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body)
}
