//! Level-one heading lookup for freeform notes.

use crate::parser::code_block::{find_code_ranges, is_in_code};

/// Text of the first `# ` heading outside code, trimmed.
pub fn first_heading(text: &str) -> Option<&str> {
    let code_ranges = find_code_ranges(text);
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        if is_in_code(start, &code_ranges) {
            continue;
        }
        if let Some(heading) = line.strip_prefix("# ") {
            let heading = heading.trim();
            if !heading.is_empty() {
                return Some(heading);
            }
        }
    }

    None
}
