//! Tags command implementation.

use crate::cli::output::Output;
use crate::error::Result;
use crate::vault::Vault;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub total: usize,
    pub tags: Vec<String>,
}

pub fn run(vault: &Vault, output: &Output) -> Result<()> {
    let tags = vault.get_all_tags();
    output.print(&TagsResponse {
        total: tags.len(),
        tags,
    })
}
