//! List command implementation.

use crate::cli::args::{ListArgs, SortField};
use crate::cli::output::{NoteListResponse, Output};
use crate::error::Result;
use crate::note::Note;
use crate::vault::Vault;
use std::cmp::Ordering;

pub fn run(vault: &Vault, args: &ListArgs, output: &Output) -> Result<()> {
    let notes = select(vault, args);
    output.print(&NoteListResponse::new(&notes))
}

/// Apply the filters, sort order and limit from `args`.
pub fn select(vault: &Vault, args: &ListArgs) -> Vec<Note> {
    let mut notes = match args.tag.as_deref() {
        Some(tag) => vault.get_by_tag(tag.trim_start_matches('#')),
        None => vault.get_all(),
    };

    notes.retain(|n| (args.archived || !n.is_archived) && (!args.pinned || n.is_pinned));

    notes.sort_by(|a, b| compare(a, b, args.sort));
    if args.reverse {
        notes.reverse();
    }
    if let Some(limit) = args.limit {
        notes.truncate(limit);
    }
    notes
}

fn compare(a: &Note, b: &Note, field: SortField) -> Ordering {
    let primary = match field {
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortField::Path => a.path.cmp(&b.path),
        // Newest first
        SortField::Created => b.created.cmp(&a.created),
        SortField::Modified => b.modified.cmp(&a.modified),
    };
    primary.then_with(|| a.path.cmp(&b.path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::NoteUpdate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn args() -> ListArgs {
        ListArgs {
            tag: None,
            pinned: false,
            archived: false,
            sort: SortField::Title,
            reverse: false,
            limit: None,
        }
    }

    fn titles(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.title.as_str()).collect()
    }

    fn setup() -> (TempDir, Vault) {
        let dir = TempDir::new().unwrap();
        let vault = Vault::open(dir.path()).unwrap();
        vault.load().unwrap();

        let b = vault.create("banana", "").unwrap();
        vault.add_tag(b.id(), "fruit").unwrap();
        let a = vault.create("Apple", "").unwrap();
        vault.add_tag(a.id(), "fruit").unwrap();
        let c = vault.create("Carrot", "").unwrap();
        vault
            .update(
                c.id(),
                NoteUpdate {
                    is_archived: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        (dir, vault)
    }

    #[test]
    fn test_default_hides_archived_and_sorts_by_title() {
        let (_dir, vault) = setup();
        let notes = select(&vault, &args());
        assert_eq!(titles(&notes), vec!["Apple", "banana"]);
    }

    #[test]
    fn test_include_archived_with_reverse_and_limit() {
        let (_dir, vault) = setup();
        let notes = select(
            &vault,
            &ListArgs {
                archived: true,
                reverse: true,
                limit: Some(2),
                ..args()
            },
        );
        assert_eq!(titles(&notes), vec!["Carrot", "banana"]);
    }

    #[test]
    fn test_filter_by_tag_accepts_hash_prefix() {
        let (_dir, vault) = setup();
        let notes = select(
            &vault,
            &ListArgs {
                tag: Some("#fruit".to_string()),
                ..args()
            },
        );
        assert_eq!(titles(&notes), vec!["Apple", "banana"]);
    }

    #[test]
    fn test_pinned_only() {
        let (_dir, vault) = setup();
        assert!(select(&vault, &ListArgs { pinned: true, ..args() }).is_empty());
    }
}
