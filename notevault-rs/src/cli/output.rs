//! Output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::error::Result;
use crate::note::Note;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Helper for formatting and printing output.
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Render a serializable value in the configured format.
    pub fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
            OutputFormat::Toml => toml::to_string_pretty(value)?,
        })
    }

    /// Print a serializable value in the configured format.
    pub fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", self.render(value)?);
        Ok(())
    }

    /// Print raw text (not serialized).
    pub fn print_raw(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a message to stderr unless in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}

/// Compact view of a note for listings.
#[derive(Debug, Serialize)]
pub struct NoteSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub tags: Vec<String>,
    pub pinned: bool,
    pub archived: bool,
    pub color: String,
    pub modified: DateTime<Utc>,
}

impl From<&Note> for NoteSummary {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id(),
            title: note.title.clone(),
            path: note.path.as_ref().map(|p| p.to_string_lossy().to_string()),
            tags: note.tags.iter().cloned().collect(),
            pinned: note.is_pinned,
            archived: note.is_archived,
            color: note.color.clone(),
            modified: note.modified,
        }
    }
}

/// A list of notes with a count.
#[derive(Debug, Serialize)]
pub struct NoteListResponse {
    pub total: usize,
    pub notes: Vec<NoteSummary>,
}

impl NoteListResponse {
    pub fn new<'a>(notes: impl IntoIterator<Item = &'a Note>) -> Self {
        let notes: Vec<NoteSummary> = notes.into_iter().map(NoteSummary::from).collect();
        Self {
            total: notes.len(),
            notes,
        }
    }
}

/// Response wrapping a full note.
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub note: Note,
}

/// Standard response for commands that only report what they did.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}
