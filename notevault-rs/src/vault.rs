//! The vault store: an in-memory view of every note, persisted as files.
//!
//! All cached state lives behind one mutex. The lock is only held for
//! in-memory work; file reads and writes happen outside it, so a concurrent
//! reader may briefly see the value from before a write completes.
//!
//! Saves of the same note run one at a time; saves of different notes run in
//! parallel. A path is marked while a `save` writes it, and the path a note
//! moved away from stays marked until its old file is gone. Reconciliation
//! leaves marked paths alone, so a note never gets picked up a second time
//! from its own half-committed or about-to-be-deleted file.

use crate::codec::{self, Decoded};
use crate::config::VaultConfig;
use crate::error::{Result, VaultError};
use crate::note::{Note, NoteUpdate};
use crate::tag_index::TagIndex;
use chrono::{DateTime, Utc};
use parking_lot::{Condvar, Mutex};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Summary of a full load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    /// Files that could not be read.
    pub skipped: usize,
    /// Files read without frontmatter or with fields that fell back to defaults.
    pub degraded: usize,
}

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: usize,
    pub reloaded: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl SyncReport {
    pub fn changed(&self) -> usize {
        self.added + self.reloaded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncAction {
    Add,
    Reload,
    Unchanged,
}

#[derive(Debug, Default)]
struct VaultState {
    notes: HashMap<Uuid, Note>,
    by_path: HashMap<PathBuf, Uuid>,
    /// Last mtime this process wrote or read for each path.
    seen_mtimes: HashMap<PathBuf, SystemTime>,
    /// Paths being written by a `save`, or vacated by one and not yet deleted.
    writing: HashMap<PathBuf, Uuid>,
    /// Notes with a `save` in progress.
    saving: HashSet<Uuid>,
    tags: TagIndex,
}

impl VaultState {
    /// Insert or overwrite a note by id.
    fn commit(&mut self, note: Note, mtime: Option<SystemTime>) {
        let old_path = self.notes.get(&note.id).and_then(|n| n.path.clone());
        if let Some(old) = old_path {
            if note.path.as_ref() != Some(&old) && self.by_path.get(&old) == Some(&note.id) {
                self.by_path.remove(&old);
                self.seen_mtimes.remove(&old);
            }
        }

        if let Some(path) = &note.path {
            self.by_path.insert(path.clone(), note.id);
            match mtime {
                Some(t) => self.seen_mtimes.insert(path.clone(), t),
                None => self.seen_mtimes.remove(path),
            };
        }

        self.tags.extend(&note.tags);
        self.notes.insert(note.id, note);
    }

    /// Merge a note read from disk, keeping the id already cached for its path.
    fn upsert_from_disk(&mut self, note: Note, mtime: SystemTime) -> Uuid {
        let Some(path) = note.path.clone() else {
            let id = note.id;
            self.commit(note, Some(mtime));
            return id;
        };

        match self.by_path.get(&path).copied() {
            Some(id) if self.notes.contains_key(&id) => {
                let mut cached = self.notes[&id].clone();
                cached.replace_fields(note);
                self.commit(cached, Some(mtime));
                id
            }
            _ => {
                let id = note.id;
                self.commit(note, Some(mtime));
                id
            }
        }
    }

    fn classify(&self, path: &Path, mtime: SystemTime) -> SyncAction {
        if self.writing.contains_key(path) {
            return SyncAction::Unchanged;
        }
        let Some(note) = self.by_path.get(path).and_then(|id| self.notes.get(id)) else {
            return SyncAction::Add;
        };
        if self.seen_mtimes.get(path) == Some(&mtime) {
            return SyncAction::Unchanged;
        }
        if DateTime::<Utc>::from(mtime) > note.modified {
            SyncAction::Reload
        } else {
            SyncAction::Unchanged
        }
    }
}

/// A directory of note files plus the cached, indexed view of them.
#[derive(Debug)]
pub struct Vault {
    root: PathBuf,
    config: VaultConfig,
    state: Mutex<VaultState>,
    /// Signalled whenever a `save` finishes.
    save_done: Condvar,
}

impl Vault {
    /// Open a vault with default settings, creating the root if missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(root, VaultConfig::default())
    }

    /// Open a vault with explicit settings, creating the root if missing.
    ///
    /// Nothing is read from disk until [`Vault::load`].
    pub fn with_config(root: impl Into<PathBuf>, config: VaultConfig) -> Result<Self> {
        let root = root.into();

        if root.exists() && !root.is_dir() {
            return Err(VaultError::InvalidVaultPath(root));
        }
        fs::create_dir_all(&root)?;

        Ok(Self {
            root,
            config,
            state: Mutex::new(VaultState::default()),
            save_done: Condvar::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Absolute path of a note file.
    pub fn note_file_path(&self, relative_path: &Path) -> PathBuf {
        self.root.join(relative_path)
    }

    /// List note files under the root, relative and sorted.
    ///
    /// Hidden files and anything inside hidden directories are skipped.
    pub fn list_note_files(&self) -> Result<Vec<PathBuf>> {
        let root = glob::Pattern::escape(&self.root.to_string_lossy());
        let pattern = format!("{}/**/*.{}", root, self.config.extension());

        let mut files = Vec::new();
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) => {
                    if !path.is_file() {
                        continue;
                    }
                    if let Ok(relative) = path.strip_prefix(&self.root) {
                        let hidden = relative
                            .components()
                            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'));
                        if !hidden {
                            files.push(relative.to_path_buf());
                        }
                    }
                }
                Err(e) => warn!(error = %e, "glob error while scanning vault"),
            }
        }

        files.sort();
        Ok(files)
    }

    /// Read every note file into the cache.
    ///
    /// Unreadable files are logged and skipped. A path that is already cached
    /// keeps its id, so calling this twice does not duplicate notes.
    pub fn load(&self) -> Result<LoadReport> {
        let files = self.list_note_files()?;
        let mut report = LoadReport::default();

        for relative in files {
            match self.read_note_file(&relative) {
                Ok((decoded, mtime)) => {
                    if decoded.is_degraded() {
                        report.degraded += 1;
                        log_degraded(&relative, &decoded);
                    }
                    self.state.lock().upsert_from_disk(decoded.note, mtime);
                    report.loaded += 1;
                }
                Err(e) => {
                    warn!(path = %relative.display(), error = %e, "skipping unreadable note");
                    report.skipped += 1;
                }
            }
        }

        info!(
            root = %self.root.display(),
            loaded = report.loaded,
            skipped = report.skipped,
            "vault loaded"
        );
        Ok(report)
    }

    /// Write a note and cache it.
    ///
    /// The path is derived from the title when unset. The file is written
    /// before the cache is touched, so a failed write leaves the cache as it
    /// was. Moving an existing note to a new path removes its old file.
    /// Blocks while another `save` of the same note is in progress.
    pub fn save(&self, mut note: Note) -> Result<Note> {
        let relative = note.relative_path(self.config.extension());
        validate_relative(&relative)?;
        note.path = Some(relative.clone());

        {
            let mut state = self.state.lock();
            while state.saving.contains(&note.id) {
                self.save_done.wait(&mut state);
            }

            let claimed = state
                .by_path
                .get(&relative)
                .or_else(|| state.writing.get(&relative))
                .copied();
            if let Some(owner) = claimed {
                if owner != note.id {
                    return Err(VaultError::PathConflict {
                        path: relative,
                        owner,
                    });
                }
            }
            state.saving.insert(note.id);
            state.writing.insert(relative.clone(), note.id);
        }

        let result = self.write_and_commit(&relative, &note);

        self.state.lock().saving.remove(&note.id);
        self.save_done.notify_all();

        result?;
        debug!(id = %note.id, path = %relative.display(), "saved note");
        Ok(note)
    }

    /// Write the file, commit the note, then delete the file it moved away from.
    ///
    /// The vacated path is marked under the same lock that drops it from the
    /// path index, and unmarked only once the file is gone.
    fn write_and_commit(&self, relative: &Path, note: &Note) -> Result<()> {
        let written = self.write_note_file(relative, note);

        let vacated = {
            let mut state = self.state.lock();
            state.writing.remove(relative);
            let mtime = written?;

            let vacated = state
                .notes
                .get(&note.id)
                .and_then(|n| n.path.clone())
                .filter(|old| old != relative);
            if let Some(old) = &vacated {
                state.writing.insert(old.clone(), note.id);
            }
            state.commit(note.clone(), mtime);
            vacated
        };

        if let Some(old) = vacated {
            if let Err(e) = remove_if_exists(&self.note_file_path(&old)) {
                warn!(path = %old.display(), error = %e, "failed to remove file of moved note");
            }
            self.state.lock().writing.remove(&old);
        }
        Ok(())
    }

    /// Encode and write a note, returning the file's new mtime if readable.
    fn write_note_file(&self, relative: &Path, note: &Note) -> Result<Option<SystemTime>> {
        let full_path = self.note_file_path(relative);
        let write_err = |source: io::Error| VaultError::Write {
            path: full_path.clone(),
            source,
        };

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&full_path, codec::encode(note)).map_err(write_err)?;
        Ok(fs::metadata(&full_path).and_then(|m| m.modified()).ok())
    }

    /// Same as [`Vault::save`].
    pub fn add(&self, note: Note) -> Result<Note> {
        self.save(note)
    }

    /// Create and save a new note.
    pub fn create(&self, title: &str, content: &str) -> Result<Note> {
        self.save(Note::new(title, content))
    }

    /// Cached note by id.
    pub fn get(&self, id: Uuid) -> Option<Note> {
        self.state.lock().notes.get(&id).cloned()
    }

    /// Cached note by relative path.
    pub fn get_by_path(&self, relative_path: &Path) -> Option<Note> {
        let state = self.state.lock();
        state
            .by_path
            .get(relative_path)
            .and_then(|id| state.notes.get(id))
            .cloned()
    }

    /// Apply field changes to a note and save it.
    pub fn update(&self, id: Uuid, update: NoteUpdate) -> Result<Note> {
        let mut note = self.get(id).ok_or(VaultError::NoteNotFound(id))?;
        note.apply(update);
        self.save(note)
    }

    /// Add a tag to a note and save it.
    pub fn add_tag(&self, id: Uuid, tag: &str) -> Result<Note> {
        let mut note = self.get(id).ok_or(VaultError::NoteNotFound(id))?;
        note.add_tag(tag);
        self.save(note)
    }

    /// Remove a tag from a note and save it. The tag stays in the index.
    pub fn remove_tag(&self, id: Uuid, tag: &str) -> Result<Note> {
        let mut note = self.get(id).ok_or(VaultError::NoteNotFound(id))?;
        note.remove_tag(tag);
        self.save(note)
    }

    /// Delete a note's file and drop it from the cache.
    ///
    /// A file that is already gone is not an error. Tags stay in the index.
    pub fn remove(&self, id: Uuid) -> Result<Note> {
        let note = self.get(id).ok_or(VaultError::NoteNotFound(id))?;

        if let Some(relative) = &note.path {
            let full_path = self.note_file_path(relative);
            remove_if_exists(&full_path).map_err(|source| VaultError::Write {
                path: full_path,
                source,
            })?;
        }

        let mut state = self.state.lock();
        state.notes.remove(&id);
        if let Some(relative) = &note.path {
            if state.by_path.get(relative) == Some(&id) {
                state.by_path.remove(relative);
                state.seen_mtimes.remove(relative);
            }
        }
        debug!(id = %id, "removed note");
        Ok(note)
    }

    /// Snapshot of every cached note, in no particular order.
    pub fn get_all(&self) -> Vec<Note> {
        self.state.lock().notes.values().cloned().collect()
    }

    /// Notes carrying exactly `tag`.
    pub fn get_by_tag(&self, tag: &str) -> Vec<Note> {
        let state = self.state.lock();
        if !state.tags.contains(tag) {
            return Vec::new();
        }
        state
            .notes
            .values()
            .filter(|n| n.has_tag(tag))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over title, content and tags.
    pub fn search(&self, query: &str) -> Vec<Note> {
        let needle = query.to_lowercase();
        self.state
            .lock()
            .notes
            .values()
            .filter(|n| n.matches_lowercase(&needle))
            .cloned()
            .collect()
    }

    /// Every tag seen so far, sorted.
    pub fn get_all_tags(&self) -> Vec<String> {
        self.state.lock().tags.to_vec()
    }

    pub fn len(&self) -> usize {
        self.state.lock().notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().notes.is_empty()
    }

    /// Bring the cache up to date with files changed outside the process.
    ///
    /// New paths are added with a fresh id. A cached path whose file mtime is
    /// newer than the note's `modified` is reloaded in place, keeping its id.
    /// Deleted files are not noticed.
    pub fn reconcile(&self) -> Result<SyncReport> {
        let files = self.list_note_files()?;
        let mut report = SyncReport::default();

        for relative in files {
            let full_path = self.note_file_path(&relative);
            let mtime = match fs::metadata(&full_path).and_then(|m| m.modified()) {
                Ok(t) => t,
                Err(e) => {
                    warn!(path = %relative.display(), error = %e, "failed to stat note");
                    report.failed += 1;
                    continue;
                }
            };

            let action = self.state.lock().classify(&relative, mtime);
            if action == SyncAction::Unchanged {
                report.unchanged += 1;
                continue;
            }

            let (decoded, mtime) = match self.read_note_file(&relative) {
                Ok(read) => read,
                Err(e) => {
                    warn!(path = %relative.display(), error = %e, "skipping unreadable note");
                    report.failed += 1;
                    continue;
                }
            };
            if decoded.is_degraded() {
                log_degraded(&relative, &decoded);
            }

            let mut note = decoded.note;
            if action == SyncAction::Reload {
                note.modified = note.modified.max(DateTime::<Utc>::from(mtime));
            }
            let id = {
                let mut state = self.state.lock();
                if state.writing.contains_key(&relative) {
                    report.unchanged += 1;
                    continue;
                }
                state.upsert_from_disk(note, mtime)
            };

            match action {
                SyncAction::Add => {
                    debug!(id = %id, path = %relative.display(), "picked up new note file");
                    report.added += 1;
                }
                _ => {
                    debug!(id = %id, path = %relative.display(), "reloaded externally modified note");
                    report.reloaded += 1;
                }
            }
        }

        if report.changed() > 0 || report.failed > 0 {
            info!(
                added = report.added,
                reloaded = report.reloaded,
                failed = report.failed,
                "vault reconciled"
            );
        }
        Ok(report)
    }

    fn read_note_file(&self, relative: &Path) -> Result<(Decoded, SystemTime)> {
        let full_path = self.note_file_path(relative);
        let read_err = |source: io::Error| VaultError::Read {
            path: full_path.clone(),
            source,
        };

        let mtime = fs::metadata(&full_path)
            .and_then(|m| m.modified())
            .map_err(read_err)?;
        let text = fs::read_to_string(&full_path).map_err(read_err)?;

        Ok((codec::decode(&text, relative), mtime))
    }
}

fn validate_relative(path: &Path) -> Result<()> {
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || path.as_os_str().is_empty() {
        return Err(VaultError::InvalidNotePath(path.to_path_buf()));
    }
    Ok(())
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn log_degraded(path: &Path, decoded: &Decoded) {
    if decoded.warnings.is_empty() {
        debug!(path = %path.display(), "note has no frontmatter, read as freeform");
    }
    for warning in &decoded.warnings {
        debug!(path = %path.display(), %warning, "frontmatter field fell back to default");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup_test_vault() -> (TempDir, Vault) {
        let dir = TempDir::new().unwrap();
        let vault = Vault::open(dir.path()).unwrap();
        (dir, vault)
    }

    fn bump_mtime(path: &Path, by: Duration) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() + by).unwrap();
    }

    #[test]
    fn test_open_creates_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("nested").join("vault");
        let vault = Vault::open(&root).unwrap();
        assert!(root.is_dir());
        assert!(vault.is_empty());
    }

    #[test]
    fn test_open_rejects_file_root() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            Vault::open(&file),
            Err(VaultError::InvalidVaultPath(_))
        ));
    }

    #[test]
    fn test_create_writes_file() {
        let (dir, vault) = setup_test_vault();

        let note = vault.create("My First Note", "Hello").unwrap();
        assert_eq!(note.path, Some(PathBuf::from("my-first-note.md")));

        let on_disk = fs::read_to_string(dir.path().join("my-first-note.md")).unwrap();
        assert!(on_disk.starts_with("---\ntitle: My First Note\n"));
        assert!(on_disk.ends_with("\n\nHello"));

        assert_eq!(vault.get(note.id()), Some(note));
    }

    #[test]
    fn test_save_into_subdirectory() {
        let (dir, vault) = setup_test_vault();

        let mut note = Note::new("Deep", "");
        note.path = Some(PathBuf::from("a/b/deep.md"));
        vault.save(note).unwrap();

        assert!(dir.path().join("a/b/deep.md").is_file());
    }

    #[test]
    fn test_failed_write_leaves_cache_untouched() {
        let (dir, vault) = setup_test_vault();
        fs::create_dir(dir.path().join("blocked.md")).unwrap();

        let note = Note::new("Blocked", "body");
        let id = note.id();
        let result = vault.save(note);

        assert!(matches!(result, Err(VaultError::Write { .. })));
        assert!(vault.get(id).is_none());
        assert!(vault.is_empty());
    }

    #[test]
    fn test_failed_update_keeps_previous_value() {
        let (dir, vault) = setup_test_vault();
        let note = vault.create("Keep", "original").unwrap();

        let file = dir.path().join("keep.md");
        fs::remove_file(&file).unwrap();
        fs::create_dir(&file).unwrap();

        let result = vault.update(
            note.id(),
            NoteUpdate {
                content: Some("changed".to_string()),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        assert_eq!(vault.get(note.id()).unwrap().content, "original");
    }

    #[test]
    fn test_path_conflict() {
        let (_dir, vault) = setup_test_vault();
        let first = vault.create("Plan", "a").unwrap();

        let result = vault.create("plan", "b");
        match result {
            Err(VaultError::PathConflict { path, owner }) => {
                assert_eq!(path, PathBuf::from("plan.md"));
                assert_eq!(owner, first.id());
            }
            other => panic!("expected path conflict, got {:?}", other),
        }
        assert_eq!(vault.len(), 1);
    }

    #[test]
    fn test_escaping_path_rejected() {
        let (_dir, vault) = setup_test_vault();
        let mut note = Note::new("x", "");
        note.path = Some(PathBuf::from("../outside.md"));
        assert!(matches!(
            vault.save(note),
            Err(VaultError::InvalidNotePath(_))
        ));
    }

    #[test]
    fn test_update() {
        let (_dir, vault) = setup_test_vault();
        let note = vault.create("Todo", "one").unwrap();

        let updated = vault
            .update(
                note.id(),
                NoteUpdate {
                    content: Some("two".to_string()),
                    is_archived: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id(), note.id());
        assert_eq!(updated.content, "two");
        assert!(updated.is_archived);
        assert!(updated.modified >= note.modified);
        assert_eq!(vault.get(note.id()).unwrap().content, "two");
    }

    #[test]
    fn test_update_unknown_id() {
        let (_dir, vault) = setup_test_vault();
        let result = vault.update(Uuid::new_v4(), NoteUpdate::default());
        assert!(matches!(result, Err(VaultError::NoteNotFound(_))));
    }

    #[test]
    fn test_moving_note_removes_old_file() {
        let (dir, vault) = setup_test_vault();
        let mut note = vault.create("Draft", "").unwrap();

        note.path = Some(PathBuf::from("archive/draft.md"));
        vault.save(note.clone()).unwrap();

        assert!(!dir.path().join("draft.md").exists());
        assert!(dir.path().join("archive/draft.md").is_file());
        assert!(vault.get_by_path(Path::new("draft.md")).is_none());
        assert_eq!(
            vault.get_by_path(Path::new("archive/draft.md")).unwrap().id(),
            note.id()
        );
    }

    #[test]
    fn test_tags_and_queries() {
        let (_dir, vault) = setup_test_vault();
        let a = vault.create("Alpha", "first body").unwrap();
        let b = vault.create("Beta", "second body").unwrap();

        vault.add_tag(a.id(), "work").unwrap();
        vault.add_tag(b.id(), "home").unwrap();
        vault.add_tag(b.id(), "work").unwrap();

        assert_eq!(vault.get_all_tags(), vec!["home", "work"]);
        assert_eq!(vault.get_by_tag("work").len(), 2);
        assert_eq!(vault.get_by_tag("home").len(), 1);
        assert!(vault.get_by_tag("Work").is_empty());
    }

    #[test]
    fn test_tags_are_never_pruned() {
        let (_dir, vault) = setup_test_vault();
        let note = vault.create("Temp", "").unwrap();
        vault.add_tag(note.id(), "fleeting").unwrap();

        vault.remove_tag(note.id(), "fleeting").unwrap();
        assert!(vault.get(note.id()).unwrap().tags.is_empty());
        assert_eq!(vault.get_all_tags(), vec!["fleeting"]);

        vault.remove(note.id()).unwrap();
        assert_eq!(vault.get_all_tags(), vec!["fleeting"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let (_dir, vault) = setup_test_vault();
        vault.create("Hello there", "").unwrap();
        vault.create("Other", "says HELLO").unwrap();
        let tagged = vault.create("Third", "").unwrap();
        vault.add_tag(tagged.id(), "hello-world").unwrap();
        vault.create("Unrelated", "nothing").unwrap();

        let mut lower: Vec<_> = vault.search("hello").into_iter().map(|n| n.id()).collect();
        let mut upper: Vec<_> = vault.search("HELLO").into_iter().map(|n| n.id()).collect();
        lower.sort();
        upper.sort();

        assert_eq!(lower.len(), 3);
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_remove() {
        let (dir, vault) = setup_test_vault();
        let note = vault.create("Gone", "").unwrap();

        let removed = vault.remove(note.id()).unwrap();
        assert_eq!(removed.id(), note.id());
        assert!(vault.get(note.id()).is_none());
        assert!(!dir.path().join("gone.md").exists());

        assert!(matches!(
            vault.remove(note.id()),
            Err(VaultError::NoteNotFound(_))
        ));
    }

    #[test]
    fn test_remove_tolerates_missing_file() {
        let (dir, vault) = setup_test_vault();
        let note = vault.create("Ghost", "").unwrap();
        fs::remove_file(dir.path().join("ghost.md")).unwrap();

        vault.remove(note.id()).unwrap();
        assert!(vault.is_empty());
    }

    #[test]
    fn test_list_note_files_skips_hidden_and_other_extensions() {
        let (dir, vault) = setup_test_vault();
        fs::write(dir.path().join("a.md"), "A").unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.md"), "B").unwrap();
        fs::write(dir.path().join("notes.txt"), "no").unwrap();
        fs::create_dir_all(dir.path().join(".trash")).unwrap();
        fs::write(dir.path().join(".trash/c.md"), "C").unwrap();
        fs::write(dir.path().join(".hidden.md"), "D").unwrap();

        let files = vault.list_note_files().unwrap();
        assert_eq!(files, vec![PathBuf::from("a.md"), PathBuf::from("sub/b.md")]);
    }

    #[test]
    fn test_load_empty_vault() {
        let (_dir, vault) = setup_test_vault();
        let report = vault.load().unwrap();
        assert_eq!(report, LoadReport::default());
        assert!(vault.get_all().is_empty());
    }

    #[test]
    fn test_load_skips_unreadable_file() {
        let (dir, vault) = setup_test_vault();
        fs::write(
            dir.path().join("good.md"),
            "---\ntitle: Good\ntags: [ok]\n---\n\nfine",
        )
        .unwrap();
        fs::write(dir.path().join("bad.md"), [0xff, 0xfe, 0xfd]).unwrap();
        fs::write(dir.path().join("loose.md"), "# Loose\nhas #freeform tag").unwrap();

        let report = vault.load().unwrap();
        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.degraded, 1);

        let good = vault.get_by_path(Path::new("good.md")).unwrap();
        assert_eq!(good.title, "Good");
        assert_eq!(good.content, "fine");
        assert_eq!(vault.get_all_tags(), vec!["freeform", "ok"]);
    }

    #[test]
    fn test_load_twice_keeps_ids() {
        let (dir, vault) = setup_test_vault();
        fs::write(dir.path().join("one.md"), "---\ntitle: One\n---\n").unwrap();

        vault.load().unwrap();
        let id = vault.get_by_path(Path::new("one.md")).unwrap().id();
        vault.load().unwrap();

        assert_eq!(vault.len(), 1);
        assert_eq!(vault.get_by_path(Path::new("one.md")).unwrap().id(), id);
    }

    #[test]
    fn test_reconcile_picks_up_new_file() {
        let (dir, vault) = setup_test_vault();
        vault.load().unwrap();

        fs::write(
            dir.path().join("external.md"),
            "---\ntitle: External\ntags: [outside]\n---\n\nwritten by an editor",
        )
        .unwrap();

        let report = vault.reconcile().unwrap();
        assert_eq!(report.added, 1);

        let note = vault.get_by_path(Path::new("external.md")).unwrap();
        assert_eq!(note.title, "External");
        assert!(note.has_tag("outside"));
        assert_eq!(vault.get_all_tags(), vec!["outside"]);
    }

    #[test]
    fn test_reconcile_ignores_own_writes() {
        let (_dir, vault) = setup_test_vault();
        let note = vault.create("Mine", "body").unwrap();

        let report = vault.reconcile().unwrap();
        assert_eq!(report.changed(), 0);
        assert_eq!(report.unchanged, 1);
        assert_eq!(vault.get(note.id()), Some(note));
    }

    #[test]
    fn test_reconcile_reloads_modified_file() {
        let (dir, vault) = setup_test_vault();
        let note = vault.create("Edited", "before").unwrap();
        let file = dir.path().join("edited.md");

        let text = fs::read_to_string(&file).unwrap().replace("before", "after");
        fs::write(&file, text).unwrap();
        bump_mtime(&file, Duration::from_secs(60));

        let report = vault.reconcile().unwrap();
        assert_eq!(report.reloaded, 1);

        let reloaded = vault.get(note.id()).unwrap();
        assert_eq!(reloaded.content, "after");
        assert!(reloaded.modified > note.modified);

        let again = vault.reconcile().unwrap();
        assert_eq!(again.changed(), 0);
    }

    #[test]
    fn test_reconcile_skips_file_not_newer() {
        let (dir, vault) = setup_test_vault();
        let note = vault.create("Stale", "cached").unwrap();
        let file = dir.path().join("stale.md");

        fs::write(&file, "---\ntitle: Stale\n---\n\nolder edit").unwrap();
        let past = File::options().write(true).open(&file).unwrap();
        past.set_modified(SystemTime::now() - Duration::from_secs(3600))
            .unwrap();

        let report = vault.reconcile().unwrap();
        assert_eq!(report.reloaded, 0);
        assert_eq!(vault.get(note.id()).unwrap().content, "cached");
    }

    #[test]
    fn test_reconcile_skips_path_mid_save() {
        let (dir, vault) = setup_test_vault();
        fs::write(dir.path().join("pending.md"), "# Pending\n").unwrap();
        vault
            .state
            .lock()
            .writing
            .insert(PathBuf::from("pending.md"), Uuid::new_v4());

        let report = vault.reconcile().unwrap();
        assert_eq!(report.added, 0);
        assert_eq!(report.unchanged, 1);
        assert!(vault.is_empty());
    }

    #[test]
    fn test_save_conflicts_with_path_mid_save() {
        let (_dir, vault) = setup_test_vault();
        let other = Uuid::new_v4();
        vault.state.lock().writing.insert(PathBuf::from("a.md"), other);

        match vault.create("A", "") {
            Err(VaultError::PathConflict { owner, .. }) => assert_eq!(owner, other),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_moving_note_while_reconciling() {
        let (_dir, vault) = setup_test_vault();
        let mut note = vault.create("Mover", "body").unwrap();
        let stop = AtomicBool::new(false);

        note = thread::scope(|s| {
            s.spawn(|| {
                while !stop.load(Ordering::Relaxed) {
                    vault.reconcile().unwrap();
                }
            });
            for i in 0..500 {
                note.path = Some(PathBuf::from(format!("m{}.md", i % 2)));
                note = vault.save(note).unwrap();
            }
            stop.store(true, Ordering::Relaxed);
            note
        });

        let report = vault.reconcile().unwrap();
        assert_eq!(report.added, 0);
        assert_eq!(vault.len(), 1);
        assert_eq!(vault.list_note_files().unwrap(), vec![PathBuf::from("m1.md")]);
        assert_eq!(
            vault.get(note.id()).unwrap().path,
            Some(PathBuf::from("m1.md"))
        );
        assert!(vault.state.lock().writing.is_empty());
    }

    #[test]
    fn test_concurrent_saves_of_one_note_are_serialized() {
        let (_dir, vault) = setup_test_vault();
        let note = vault.create("Shared", "v0").unwrap();

        thread::scope(|s| {
            for t in 0..4 {
                let vault = &vault;
                let mut copy = note.clone();
                s.spawn(move || {
                    for i in 0..50 {
                        copy.content = format!("t{} v{}", t, i);
                        copy.path = Some(PathBuf::from(format!("shared-{}.md", t)));
                        copy = vault.save(copy).unwrap();
                    }
                });
            }
        });

        let report = vault.reconcile().unwrap();
        assert_eq!(report.added, 0);
        assert_eq!(vault.len(), 1);

        let cached = vault.get(note.id()).unwrap();
        let path = cached.path.clone().unwrap();
        assert_eq!(vault.list_note_files().unwrap(), vec![path.clone()]);
        assert_eq!(vault.get_by_path(&path).unwrap().id(), note.id());
        assert!(vault.state.lock().saving.is_empty());
    }
}

