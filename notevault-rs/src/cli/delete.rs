//! Delete command implementation.

use crate::cli::args::DeleteArgs;
use crate::cli::find_note;
use crate::cli::output::{MessageResponse, Output};
use crate::error::Result;
use crate::vault::Vault;

pub fn run(vault: &Vault, args: &DeleteArgs, output: &Output) -> Result<()> {
    let note = find_note(vault, &args.path)?;
    let removed = vault.remove(note.id())?;

    output.print(&MessageResponse {
        message: format!("Deleted \"{}\"", removed.title),
        path: removed.path.map(|p| p.to_string_lossy().to_string()),
    })
}
