//! Frontmatter splitting and `key: value` parsing.
//!
//! Values are plain text up to the end of the line unless wrapped in double
//! quotes. Quoted values keep surrounding whitespace, may be empty, and escape
//! `"`, `\\` and line breaks with a backslash.

use std::borrow::Cow;

/// Frontmatter extraction result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterSplit<'a> {
    /// The raw block between the delimiters (without them).
    pub block: Option<&'a str>,
    /// Everything after the closing delimiter line.
    pub body: &'a str,
}

/// Split text into a frontmatter block and the rest.
///
/// The block must open on the very first line with `---` and close on a later
/// line consisting only of `---`. Anything else is treated as having no
/// frontmatter at all.
pub fn split_frontmatter(text: &str) -> FrontmatterSplit<'_> {
    let no_frontmatter = FrontmatterSplit {
        block: None,
        body: text,
    };

    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return no_frontmatter;
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            return FrontmatterSplit {
                block: Some(&rest[..offset]),
                body: &rest[offset + line.len()..],
            };
        }
        offset += line.len();
    }

    no_frontmatter
}

/// A frontmatter value: either a single line or a block list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    /// The scalar text, if this is not a block list.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    /// Interpret as a list.
    ///
    /// Scalars accept `[a, b]` and bare `a, b`. Commas inside quoted items do
    /// not split. Empty unquoted items are dropped.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            FieldValue::List(items) => items.clone(),
            FieldValue::Scalar(s) => {
                let inner = s.trim();
                let inner = inner
                    .strip_prefix('[')
                    .and_then(|i| i.strip_suffix(']'))
                    .unwrap_or(inner);
                split_items(inner).into_iter().filter_map(list_item).collect()
            }
        }
    }
}

/// Quote `value` if reading it back unquoted would change it.
pub fn quote_if_needed(value: &str) -> Cow<'_, str> {
    let needs_quotes = value.is_empty()
        || value.trim() != value
        || value.contains([',', '[', ']', '"', '\\', '\n', '\r'])
        || value.starts_with('#');
    if !needs_quotes {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    Cow::Owned(out)
}

/// Resolve a double-quoted value. `None` if `raw` is not exactly one quoted
/// string.
pub fn unquote(raw: &str) -> Option<String> {
    let inner = raw.strip_prefix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => return chars.as_str().is_empty().then_some(out),
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                other => out.push(other),
            },
            other => out.push(other),
        }
    }
    None
}

/// Split on commas that are not inside double quotes.
fn split_items(text: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                items.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&text[start..]);
    items
}

/// One list item: quoted items are taken as written, bare ones trimmed and
/// dropped when empty.
fn list_item(raw: &str) -> Option<String> {
    let raw = raw.trim();
    unquote(raw).or_else(|| (!raw.is_empty()).then(|| raw.to_string()))
}

/// Parsed `key: value` entries, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: Vec<(String, FieldValue)>,
}

impl Frontmatter {
    /// Parse a frontmatter block.
    ///
    /// Lines are split at the first `:`. A key with an empty value followed by
    /// `- item` lines becomes a block list. Lines that fit neither shape are
    /// skipped.
    pub fn parse(block: &str) -> Self {
        let mut entries: Vec<(String, FieldValue)> = Vec::new();
        // Index of the last key with an empty value, which may own list items.
        let mut open_list: Option<usize> = None;

        for raw in block.lines() {
            let line = raw.trim_end();
            let trimmed = line.trim_start();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(item) = trimmed.strip_prefix("- ").or_else(|| {
                if trimmed == "-" { Some("") } else { None }
            }) {
                if let Some(idx) = open_list {
                    let slot = &mut entries[idx].1;
                    if let FieldValue::Scalar(_) = slot {
                        *slot = FieldValue::List(Vec::new());
                    }
                    if let (FieldValue::List(items), Some(item)) = (slot, list_item(item)) {
                        items.push(item);
                    }
                }
                continue;
            }

            open_list = None;

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }

            let value = value.trim();
            entries.push((key.to_string(), FieldValue::Scalar(value.to_string())));
            if value.is_empty() {
                open_list = Some(entries.len() - 1);
            }
        }

        Self { entries }
    }

    /// Last value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Scalar value for `key`, unquoted.
    ///
    /// An empty unquoted value counts as absent; `""` is an empty string.
    pub fn scalar(&self, key: &str) -> Option<String> {
        let raw = self.get(key).and_then(FieldValue::as_scalar)?;
        unquote(raw).or_else(|| (!raw.is_empty()).then(|| raw.to_string()))
    }
}
