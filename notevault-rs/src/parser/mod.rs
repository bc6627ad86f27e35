//! Parsers for note text: frontmatter, headings, hashtags.

pub mod code_block;
pub mod frontmatter;
pub mod heading;
pub mod tag;

pub use code_block::{find_code_ranges, is_in_code, CodeRange};
pub use frontmatter::{
    quote_if_needed, split_frontmatter, unquote, FieldValue, Frontmatter, FrontmatterSplit,
};
pub use heading::first_heading;
pub use tag::parse_hashtags;
