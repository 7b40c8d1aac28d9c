use crate::models::{Note, NoteView, Tag};

/// Resolve each note's tag-id references against the catalog.
///
/// The resolved list is the subset of the catalog whose id appears in the
/// note's tag-id list, in catalog order. Ids missing from the catalog
/// (deleted tag, refresh race) simply leave a gap.
pub(crate) fn notes_with_tags(notes: &[Note], catalog: &[Tag]) -> Vec<NoteView> {
    notes
        .iter()
        .map(|note| NoteView {
            id: note.id.clone(),
            title: note.title.clone(),
            markdown: note.markdown.clone(),
            username: note.username.clone(),
            tags: catalog
                .iter()
                .filter(|tag| note.tag_ids.contains(&tag.id))
                .cloned()
                .collect(),
        })
        .collect()
}

/// Case-insensitive substring match; an empty filter matches everything.
fn matches_title(view: &NoteView, title_filter: &str) -> bool {
    title_filter.is_empty()
        || view
            .title
            .to_lowercase()
            .contains(&title_filter.to_lowercase())
}

/// Intersection match with empty-set-passes-all semantics. Used for both
/// the interest set and the locally selected tag filter: at view level an
/// empty selection means "show all" (unlike the fetch pipeline, where an
/// empty interest set clears the list).
fn matches_tag_set(view: &NoteView, wanted_ids: &[String]) -> bool {
    wanted_ids.is_empty() || view.tags.iter().any(|tag| wanted_ids.contains(&tag.id))
}

/// The derived-view composer: join + narrow, a pure function of its inputs.
pub(crate) fn compose_note_views(
    notes: &[Note],
    catalog: &[Tag],
    title_filter: &str,
    selected_tag_ids: &[String],
    interest_tag_ids: &[String],
) -> Vec<NoteView> {
    notes_with_tags(notes, catalog)
        .into_iter()
        .filter(|view| {
            matches_title(view, title_filter)
                && matches_tag_set(view, interest_tag_ids)
                && matches_tag_set(view, selected_tag_ids)
        })
        .collect()
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
            username: String::new(),
            tag_ids: tag_ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn catalog() -> Vec<Tag> {
        vec![tag("1", "AI"), tag("2", "Climate")]
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolved_tags_follow_catalog_order() {
        // Note lists its ids backwards; the view follows catalog order.
        let notes = vec![note("9", "Foo", &["2", "1"])];
        let views = notes_with_tags(&notes, &catalog());
        let labels: Vec<&str> = views[0].tags.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["AI", "Climate"]);
    }

    #[test]
    fn missing_catalog_entry_leaves_gap() {
        let notes = vec![note("9", "Foo", &["1", "99"])];
        let views = notes_with_tags(&notes, &catalog());
        assert_eq!(views[0].tags.len(), 1);
        assert_eq!(views[0].tags[0].id, "1");
    }

    #[test]
    fn title_filter_is_case_insensitive_substring() {
        let notes = vec![note("9", "Foo", &["1"])];
        let views = compose_note_views(&notes, &catalog(), "FO", &[], &[]);
        assert_eq!(views.len(), 1);
        let views = compose_note_views(&notes, &catalog(), "zz", &[], &[]);
        assert!(views.is_empty());
    }

    #[test]
    fn empty_title_filter_matches_all() {
        let notes = vec![note("9", "Foo", &[]), note("10", "Bar", &[])];
        let views = compose_note_views(&notes, &catalog(), "", &[], &[]);
        assert_eq!(views.len(), 2);
    }

    #[test]
    fn interest_filter_intersects_note_tags() {
        let notes = vec![note("9", "Foo", &["1"]), note("10", "Bar", &["2"])];
        let views = compose_note_views(&notes, &catalog(), "", &[], &ids(&["1"]));
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, "9");
    }

    #[test]
    fn empty_interest_set_is_vacuous_at_view_level() {
        let notes = vec![note("9", "Foo", &["1"])];
        let views = compose_note_views(&notes, &catalog(), "", &[], &[]);
        assert_eq!(views.len(), 1);
    }

    #[test]
    fn selected_tag_filter_is_vacuous_when_empty() {
        let notes = vec![note("9", "Foo", &["1"]), note("10", "Bar", &["2"])];
        let all = compose_note_views(&notes, &catalog(), "", &[], &[]);
        assert_eq!(all.len(), 2);
        let narrowed = compose_note_views(&notes, &catalog(), "", &ids(&["2"]), &[]);
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].id, "10");
    }

    #[test]
    fn scenario_interest_and_title_filters_combined() {
        // Catalog [{1,"AI"},{2,"Climate"}], note 9 tagged ["1"],
        // interests ["1"], title filter "fo" → included, tags [{1,"AI"}].
        let notes = vec![note("9", "Foo", &["1"])];
        let views = compose_note_views(&notes, &catalog(), "fo", &[], &ids(&["1"]));
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].tags, vec![tag("1", "AI")]);
    }

    #[test]
    fn scenario_vacuous_interest_but_title_excludes() {
        // Same catalog, interests [] → vacuous match, but "zz" excludes.
        let notes = vec![note("9", "Foo", &["1"])];
        let included = compose_note_views(&notes, &catalog(), "", &[], &[]);
        assert_eq!(included.len(), 1);
        let excluded = compose_note_views(&notes, &catalog(), "zz", &[], &[]);
        assert!(excluded.is_empty());
    }
}
