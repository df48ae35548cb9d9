use crate::note_entry::NoteEntry;

/// Notes whose title or description contains `query`, ignoring case.
/// An empty query keeps every note. Order is preserved.
pub fn filter<'a, I>(notes: I, query: &str) -> Vec<&'a NoteEntry>
where
    I: IntoIterator<Item = &'a NoteEntry>,
{
    let query = query.to_lowercase();
    notes
        .into_iter()
        .filter(|note| matches(note, &query))
        .collect()
}

fn matches(note: &NoteEntry, folded_query: &str) -> bool {
    folded_query.is_empty()
        || note.title.to_lowercase().contains(folded_query)
        || note.description.to_lowercase().contains(folded_query)
}
