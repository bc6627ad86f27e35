//! notevault - notes as markdown files, served from an in-memory index.
//!
//! # Overview
//!
//! Each note is one file under a vault root: a frontmatter block with its
//! metadata followed by the markdown body. A [`Vault`] loads every file into
//! memory, answers lookups by id, tag, and text search without touching disk,
//! and writes changes back through the [`codec`]. A [`FileSyncWatcher`] keeps
//! the cache in step with edits made by other programs.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use notevault::{FileSyncWatcher, Vault};
//!
//! let vault = Arc::new(Vault::open("/path/to/vault").unwrap());
//! vault.load().unwrap();
//!
//! let note = vault.create("Groceries", "milk, eggs").unwrap();
//! vault.add_tag(note.id(), "errands").unwrap();
//!
//! let mut watcher = FileSyncWatcher::new(Arc::clone(&vault), Duration::from_secs(2));
//! watcher.start().unwrap();
//! println!("{:?}", vault.search("milk"));
//! watcher.stop();
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod note;
pub mod parser;
pub mod tag_index;
pub mod vault;
pub mod watcher;

// Re-export main types at crate root
pub use codec::{Decoded, DecodeWarning, SourceFormat, decode, encode};
pub use config::Config;
pub use error::{Result, VaultError};
pub use note::{Note, NoteUpdate};
pub use tag_index::TagIndex;
pub use vault::{LoadReport, SyncReport, Vault};
pub use watcher::FileSyncWatcher;
