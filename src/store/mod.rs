use crate::models::{Note, Tag};

pub(crate) mod derive;

/// In-memory note/tag/interest collections. Advanced only through
/// [`reduce`]; rendering reads, never writes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct CollectionsState {
    pub notes: Vec<Note>,
    pub tags: Vec<Tag>,
    pub interest_tag_ids: Vec<String>,
}

/// State transitions. Every variant carries a server-confirmed
/// representation; there are no optimistic entries to roll back.
#[derive(Clone, Debug)]
pub(crate) enum CollectionsAction {
    NotesLoaded(Vec<Note>),
    NotesCleared,
    TagsLoaded(Vec<Tag>),
    NoteCreated { note: Note, tags: Vec<Tag> },
    NoteUpdated { note: Note, tags: Vec<Tag> },
    NoteDeleted { id: String },
    TagCreated { tag: Tag },
    TagRenamed { tag: Tag },
    TagDeleted { id: String },
    InterestsLoaded(Vec<String>),
}

/// Pure transition: current state + action → next state.
pub(crate) fn reduce(mut state: CollectionsState, action: CollectionsAction) -> CollectionsState {
    match action {
        CollectionsAction::NotesLoaded(notes) => {
            state.notes = notes;
        }
        CollectionsAction::NotesCleared => {
            state.notes.clear();
        }
        CollectionsAction::TagsLoaded(tags) => {
            state.tags = tags;
        }
        CollectionsAction::NoteCreated { note, tags } => {
            state.notes.push(note);
            merge_tags(&mut state.tags, tags);
        }
        CollectionsAction::NoteUpdated { note, tags } => {
            if let Some(slot) = state.notes.iter_mut().find(|n| n.id == note.id) {
                *slot = note;
            }
            merge_tags(&mut state.tags, tags);
        }
        CollectionsAction::NoteDeleted { id } => {
            state.notes.retain(|n| n.id != id);
        }
        CollectionsAction::TagCreated { tag } => {
            merge_tags(&mut state.tags, vec![tag]);
        }
        CollectionsAction::TagRenamed { tag } => {
            if let Some(slot) = state.tags.iter_mut().find(|t| t.id == tag.id) {
                *slot = tag;
            }
        }
        CollectionsAction::TagDeleted { id } => {
            // Catalog only. Notes keep referencing the id; they render with
            // a gap in their tag list (documented behavior).
            state.tags.retain(|t| t.id != id);
        }
        CollectionsAction::InterestsLoaded(ids) => {
            state.interest_tag_ids = ids;
        }
    }
    state
}

/// Append tags from a server response that are not yet in the catalog,
/// keyed by id. Existing entries and their order stay untouched.
fn merge_tags(catalog: &mut Vec<Tag>, incoming: Vec<Tag>) {
    for tag in incoming {
        if !catalog.iter().any(|t| t.id == tag.id) {
            catalog.push(tag);
        }
    }
}

/// Swap an inline-created tag's temporary id for the server-assigned one in
/// a form's selected-tag list. Returns false when the temporary id is gone
/// (user deselected it) or the form was already submitted with it — the
/// latter is the known reconciliation gap, see DESIGN.md.
pub(crate) fn swap_tmp_tag_id(selected: &mut [Tag], tmp_id: &str, confirmed: &Tag) -> bool {
    let mut swapped = false;
    for tag in selected.iter_mut() {
        if tag.id == tmp_id {
            tag.id = confirmed.id.clone();
            tag.label = confirmed.label.clone();
            swapped = true;
        }
    }
    swapped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(id: &str, label: &str) -> Tag {
        Tag {
            id: id.to_string(),
            label: label.to_string(),
        }
    }

    fn note(id: &str, title: &str, tag_ids: &[&str]) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            markdown: String::new(),
            username: "octocat".to_string(),
            tag_ids: tag_ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn notes_loaded_replaces_collection() {
        let state = reduce(
            CollectionsState::default(),
            CollectionsAction::NotesLoaded(vec![note("1", "a", &[])]),
        );
        let state = reduce(
            state,
            CollectionsAction::NotesLoaded(vec![note("2", "b", &[])]),
        );
        assert_eq!(state.notes.len(), 1);
        assert_eq!(state.notes[0].id, "2");
    }

    #[test]
    fn notes_cleared_empties_but_keeps_tags() {
        let mut state = CollectionsState::default();
        state.notes = vec![note("1", "a", &[])];
        state.tags = vec![tag("1", "AI")];
        let state = reduce(state, CollectionsAction::NotesCleared);
        assert!(state.notes.is_empty());
        assert_eq!(state.tags.len(), 1);
    }

    #[test]
    fn note_created_appends_and_merges_tags() {
        let mut state = CollectionsState::default();
        state.tags = vec![tag("1", "AI")];
        let state = reduce(
            state,
            CollectionsAction::NoteCreated {
                note: note("9", "Foo", &["1", "2"]),
                tags: vec![tag("1", "AI"), tag("2", "Climate")],
            },
        );
        assert_eq!(state.notes.len(), 1);
        // "1" deduplicated, "2" appended after existing entries.
        assert_eq!(state.tags.len(), 2);
        assert_eq!(state.tags[1].id, "2");
    }

    #[test]
    fn note_updated_replaces_in_place() {
        let mut state = CollectionsState::default();
        state.notes = vec![note("1", "old", &[]), note("2", "other", &[])];
        let state = reduce(
            state,
            CollectionsAction::NoteUpdated {
                note: note("1", "new", &["3"]),
                tags: vec![tag("3", "Web")],
            },
        );
        assert_eq!(state.notes[0].title, "new");
        assert_eq!(state.notes[0].tag_ids, vec!["3".to_string()]);
        assert_eq!(state.notes[1].title, "other");
        assert_eq!(state.tags[0].id, "3");
    }

    #[test]
    fn note_deleted_removes_only_that_note() {
        let mut state = CollectionsState::default();
        state.notes = vec![note("1", "a", &[]), note("2", "b", &[])];
        let state = reduce(
            state,
            CollectionsAction::NoteDeleted {
                id: "1".to_string(),
            },
        );
        assert_eq!(state.notes.len(), 1);
        assert_eq!(state.notes[0].id, "2");
    }

    #[test]
    fn tag_renamed_updates_catalog_entry() {
        let mut state = CollectionsState::default();
        state.tags = vec![tag("1", "AI"), tag("2", "Climate")];
        let state = reduce(
            state,
            CollectionsAction::TagRenamed {
                tag: tag("2", "Climate Tech"),
            },
        );
        assert_eq!(state.tags[1].label, "Climate Tech");
    }

    #[test]
    fn tag_delete_does_not_touch_note_references() {
        let mut state = CollectionsState::default();
        state.tags = vec![tag("1", "AI"), tag("2", "Climate")];
        state.notes = vec![note("9", "Foo", &["1", "2"])];
        let state = reduce(
            state,
            CollectionsAction::TagDeleted {
                id: "2".to_string(),
            },
        );
        assert_eq!(state.tags.len(), 1);
        // The note still references the deleted id; the view renders a gap.
        assert_eq!(state.notes[0].tag_ids, vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn tag_created_is_idempotent_by_id() {
        let state = reduce(
            CollectionsState::default(),
            CollectionsAction::TagCreated { tag: tag("5", "Web") },
        );
        let state = reduce(
            state,
            CollectionsAction::TagCreated { tag: tag("5", "Web") },
        );
        assert_eq!(state.tags.len(), 1);
    }

    #[test]
    fn interests_loaded_replaces_set() {
        let state = reduce(
            CollectionsState::default(),
            CollectionsAction::InterestsLoaded(vec!["1".to_string(), "2".to_string()]),
        );
        assert_eq!(state.interest_tag_ids.len(), 2);
    }

    #[test]
    fn tmp_tag_id_swaps_to_confirmed_id() {
        let mut selected = vec![tag("1", "AI"), tag("tmp-1", "Robotics")];
        let confirmed = tag("7", "Robotics");
        assert!(swap_tmp_tag_id(&mut selected, "tmp-1", &confirmed));
        assert_eq!(selected[1].id, "7");
    }

    #[test]
    fn tmp_tag_swap_reports_when_already_gone() {
        // Submit-before-confirmation leaves nothing to swap; the payload
        // already carried the temporary id (coerced to null server-side).
        let mut selected = vec![tag("1", "AI")];
        let confirmed = tag("7", "Robotics");
        assert!(!swap_tmp_tag_id(&mut selected, "tmp-1", &confirmed));
    }
}
