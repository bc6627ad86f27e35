//! Note representation and operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// Title given to notes created or decoded without one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Color label for notes that never had one set.
pub const DEFAULT_COLOR: &str = "default";

/// A note in the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub(crate) id: Uuid,

    /// Display title, never empty.
    pub title: String,

    /// Markdown body below the frontmatter.
    pub content: String,

    pub tags: BTreeSet<String>,

    /// Path relative to the vault root. Derived from the title when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,

    pub is_pinned: bool,
    pub is_archived: bool,
    pub color: String,

    /// Outbound references to other notes. Not validated.
    pub links: BTreeSet<String>,
}

impl Note {
    /// Create a new note with a fresh id and timestamps.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: normalize_title(title.into()),
            content: content.into(),
            tags: BTreeSet::new(),
            path: None,
            created: now,
            modified: now,
            is_pinned: false,
            is_archived: false,
            color: DEFAULT_COLOR.to_string(),
            links: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Add a tag. Returns `true` if it was not already present.
    ///
    /// `modified` is refreshed either way.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        let inserted = self.tags.insert(tag.into());
        self.touch();
        inserted
    }

    /// Remove a tag. Returns `true` if it was present.
    ///
    /// `modified` is refreshed even when the tag was absent.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let removed = self.tags.remove(tag);
        self.touch();
        removed
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Refresh `modified`, keeping it at or after `created`.
    pub fn touch(&mut self) {
        self.modified = Utc::now().max(self.created);
    }

    /// Apply a partial update and refresh `modified`.
    pub fn apply(&mut self, update: NoteUpdate) {
        if let Some(title) = update.title {
            self.title = normalize_title(title);
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(pinned) = update.is_pinned {
            self.is_pinned = pinned;
        }
        if let Some(archived) = update.is_archived {
            self.is_archived = archived;
        }
        if let Some(links) = update.links {
            self.links = links;
        }
        self.touch();
    }

    /// The explicit path, or the one derived from the title.
    pub fn relative_path(&self, extension: &str) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| derive_path(&self.title, extension))
    }

    /// Case-insensitive match against title, content, or any tag.
    ///
    /// `needle` must already be lower-cased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }

    /// Take every field except `id` and `path` from `other`.
    pub(crate) fn replace_fields(&mut self, other: Note) {
        self.title = other.title;
        self.content = other.content;
        self.tags = other.tags;
        self.created = other.created;
        self.modified = other.modified.max(other.created);
        self.is_pinned = other.is_pinned;
        self.is_archived = other.is_archived;
        self.color = other.color;
        self.links = other.links;
    }
}

/// Fields that can be changed through [`crate::Vault::update`].
///
/// `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<BTreeSet<String>>,
    pub color: Option<String>,
    pub is_pinned: Option<bool>,
    pub is_archived: Option<bool>,
    pub links: Option<BTreeSet<String>>,
}

impl NoteUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Derive a file path from a title.
///
/// NFC-normalized, lower-cased, whitespace and path separators replaced with
/// `-`, leading dots stripped. Distinct titles may map to the same path.
pub fn derive_path(title: &str, extension: &str) -> PathBuf {
    let normalized: String = title.trim().nfc().collect();
    let stem: String = normalized
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '-'
            } else {
                c
            }
        })
        .collect();
    let stem = stem.trim_start_matches('.');
    let stem = if stem.is_empty() {
        DEFAULT_TITLE.to_lowercase()
    } else {
        stem.to_string()
    };
    PathBuf::from(format!("{}.{}", stem, extension.trim_start_matches('.')))
}

fn normalize_title(title: String) -> String {
    if title.trim().is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title
    }
}
