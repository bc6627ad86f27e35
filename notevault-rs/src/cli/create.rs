//! Create command implementation.

use crate::cli::args::CreateArgs;
use crate::cli::normalize_note_path;
use crate::cli::output::{NoteResponse, Output};
use crate::codec;
use crate::error::Result;
use crate::note::Note;
use crate::vault::Vault;
use std::io::{self, IsTerminal, Read};

pub fn run(vault: &Vault, args: &CreateArgs, output: &Output) -> Result<()> {
    let content = match &args.content {
        Some(content) => content.replace("\\n", "\n"),
        None => read_stdin()?,
    };
    let note = build_note(vault, args, content);

    if args.dry_run {
        output.print_raw(&codec::encode(&note));
        return Ok(());
    }

    let note = vault.add(note)?;
    if let Some(path) = &note.path {
        output.info(&format!("Created {}", path.display()));
    }
    output.print(&NoteResponse { note })
}

fn build_note(vault: &Vault, args: &CreateArgs, content: String) -> Note {
    let mut note = Note::new(args.title.as_str(), content);
    for tag in &args.tags {
        note.add_tag(tag.trim_start_matches('#'));
    }
    if let Some(color) = &args.color {
        note.color = color.clone();
    }
    note.is_pinned = args.pinned;
    note.path = args.path.as_deref().map(|p| normalize_note_path(vault, p));
    note
}

/// Piped stdin becomes the body; an interactive terminal means no body.
fn read_stdin() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(buffer)
}
