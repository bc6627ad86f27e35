//! CLI command implementations.

pub mod args;
pub mod output;

pub mod create;
pub mod delete;
pub mod list;
pub mod search;
pub mod show;
pub mod tags;
pub mod update;
pub mod watch;

pub use args::{Cli, Commands};
pub use output::Output;

use crate::error::{Result, VaultError};
use crate::note::Note;
use crate::vault::Vault;
use std::path::PathBuf;

/// Turn a user-supplied note path into one relative to the vault root,
/// appending the vault's extension when it is missing.
pub fn normalize_note_path(vault: &Vault, raw: &str) -> PathBuf {
    let trimmed = raw.trim().trim_start_matches("./");
    let mut path = PathBuf::from(trimmed);
    if path.extension().is_none() {
        path.set_extension(vault.config().extension());
    }
    path
}

/// Look up a note by user-supplied path.
pub fn find_note(vault: &Vault, raw: &str) -> Result<Note> {
    let path = normalize_note_path(vault, raw);
    vault
        .get_by_path(&path)
        .ok_or(VaultError::PathNotFound(path))
}
