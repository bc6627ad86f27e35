//! Hashtag scanning (#tag and #tag/subtag) for freeform notes.

use crate::parser::code_block::{find_code_ranges, is_in_code};
use regex::Regex;
use std::sync::LazyLock;

// `#` preceded by start of text or a non-word, non-`&` character. The tag
// must start with a letter or underscore so `#123` is not a tag. The regex
// crate has no lookahead, so the following character is checked by hand.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w&])#([a-zA-Z_][\w/-]*)").unwrap());

/// Collect hashtags from `text`, without the leading `#`.
///
/// Order of first occurrence is kept and duplicates are dropped. Tags inside
/// code or `[[wikilinks]]` are skipped.
pub fn parse_hashtags(text: &str) -> Vec<String> {
    let code_ranges = find_code_ranges(text);
    let mut tags: Vec<String> = Vec::new();

    for cap in TAG.captures_iter(text) {
        let Some(name) = cap.get(1) else {
            continue;
        };
        let hash = name.start() - 1;
        let end = name.end();

        if let Some(next) = text[end..].chars().next() {
            if next.is_alphanumeric() || next == '_' || next == '/' {
                continue;
            }
        }

        if is_in_code(hash, &code_ranges) || is_in_wikilink(text, hash) {
            continue;
        }

        let tag = name.as_str().trim_end_matches(['/', '-']);
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }

    tags
}

/// Check if a position is between `[[` and a later `]]`.
fn is_in_wikilink(text: &str, pos: usize) -> bool {
    let before = &text[..pos];
    let after = &text[pos..];

    match (before.rfind("[["), before.rfind("]]")) {
        (Some(open), Some(close)) if open > close => after.contains("]]"),
        (Some(_), None) => after.contains("]]"),
        _ => false,
    }
}
