//! Code span detection so tags and headings inside code are ignored.

use regex::Regex;
use std::sync::LazyLock;

/// A byte range covered by a fenced block or an inline code span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeRange {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

// Single-backtick inline code on one line.
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`\n]+`").unwrap());

/// Find all fenced blocks and inline code spans in `text`.
///
/// An unclosed fence runs to the end of the text.
pub fn find_code_ranges(text: &str) -> Vec<CodeRange> {
    let mut ranges = Vec::new();

    // (fence char, fence length, start offset)
    let mut open: Option<(char, usize, usize)> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let fence = fence_marker(trimmed);

        match (open, fence) {
            (None, Some((ch, len))) => open = Some((ch, len, offset)),
            (Some((open_ch, open_len, start)), Some((ch, len)))
                if ch == open_ch
                    && len >= open_len
                    && trimmed.trim_end()[len..].trim().is_empty() =>
            {
                ranges.push(CodeRange {
                    start,
                    end: offset + line.len(),
                });
                open = None;
            }
            _ => {}
        }

        offset += line.len();
    }

    if let Some((_, _, start)) = open {
        ranges.push(CodeRange {
            start,
            end: text.len(),
        });
    }

    let fenced = ranges.clone();
    for m in INLINE_CODE.find_iter(text) {
        if !is_in_code(m.start(), &fenced) {
            ranges.push(CodeRange {
                start: m.start(),
                end: m.end(),
            });
        }
    }

    ranges.sort_by_key(|r| r.start);
    ranges
}

/// Check whether a byte offset falls inside any of `ranges`.
pub fn is_in_code(pos: usize, ranges: &[CodeRange]) -> bool {
    ranges.iter().any(|r| pos >= r.start && pos < r.end)
}

fn fence_marker(line: &str) -> Option<(char, usize)> {
    let ch = line.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }
    let len = line.chars().take_while(|&c| c == ch).count();
    (len >= 3).then_some((ch, len))
}
