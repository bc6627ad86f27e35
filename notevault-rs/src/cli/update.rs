//! Update command implementation.

use crate::cli::args::UpdateArgs;
use crate::cli::find_note;
use crate::cli::output::{NoteResponse, Output};
use crate::error::Result;
use crate::note::{Note, NoteUpdate};
use crate::vault::Vault;

pub fn run(vault: &Vault, args: &UpdateArgs, output: &Output) -> Result<()> {
    let note = find_note(vault, &args.path)?;
    let update = build_update(&note, args);
    if update.is_empty() {
        output.info("Nothing to change");
        return output.print(&NoteResponse { note });
    }

    let note = vault.update(note.id(), update)?;
    output.print(&NoteResponse { note })
}

fn build_update(note: &Note, args: &UpdateArgs) -> NoteUpdate {
    let tags = if args.add_tags.is_empty() && args.remove_tags.is_empty() {
        None
    } else {
        let mut tags = note.tags.clone();
        tags.extend(args.add_tags.iter().map(|t| t.trim_start_matches('#').to_string()));
        for tag in &args.remove_tags {
            tags.remove(tag.trim_start_matches('#'));
        }
        Some(tags)
    };

    NoteUpdate {
        title: args.title.clone(),
        content: args.content.as_ref().map(|c| c.replace("\\n", "\n")),
        tags,
        color: args.color.clone(),
        is_pinned: flag(args.pin, args.unpin),
        is_archived: flag(args.archive, args.unarchive),
        links: None,
    }
}

fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn args() -> UpdateArgs {
        UpdateArgs {
            path: "n".to_string(),
            title: None,
            content: None,
            add_tags: Vec::new(),
            remove_tags: Vec::new(),
            color: None,
            pin: false,
            unpin: false,
            archive: false,
            unarchive: false,
        }
    }

    #[test]
    fn test_empty_update() {
        let note = Note::new("N", "");
        assert!(build_update(&note, &args()).is_empty());
    }

    #[test]
    fn test_tag_changes() {
        let mut note = Note::new("N", "");
        note.add_tag("old");
        note.add_tag("keep");

        let update = build_update(
            &note,
            &UpdateArgs {
                add_tags: vec!["#new".to_string()],
                remove_tags: vec!["old".to_string()],
                ..args()
            },
        );
        let expected: BTreeSet<String> = ["keep", "new"].iter().map(|s| s.to_string()).collect();
        assert_eq!(update.tags, Some(expected));
    }

    #[test]
    fn test_flags() {
        let note = Note::new("N", "");
        let update = build_update(
            &note,
            &UpdateArgs {
                unpin: true,
                archive: true,
                ..args()
            },
        );
        assert_eq!(update.is_pinned, Some(false));
        assert_eq!(update.is_archived, Some(true));
    }
}
