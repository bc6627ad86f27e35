//! Search command implementation.

use crate::cli::args::SearchArgs;
use crate::cli::output::{NoteListResponse, Output};
use crate::error::Result;
use crate::vault::Vault;

pub fn run(vault: &Vault, args: &SearchArgs, output: &Output) -> Result<()> {
    let mut notes = vault.search(&args.query);
    notes.sort_by(|a, b| b.modified.cmp(&a.modified));
    if let Some(limit) = args.limit {
        notes.truncate(limit);
    }
    output.print(&NoteListResponse::new(&notes))
}
