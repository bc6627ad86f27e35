//! Show command implementation.

use crate::cli::args::ShowArgs;
use crate::cli::find_note;
use crate::cli::output::{NoteResponse, Output};
use crate::error::Result;
use crate::vault::Vault;

pub fn run(vault: &Vault, args: &ShowArgs, output: &Output) -> Result<()> {
    let note = find_note(vault, &args.path)?;
    output.print(&NoteResponse { note })
}
