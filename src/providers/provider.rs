use crate::error::RemoteError;
use crate::note_entry::{NoteDraft, NoteEntry};

/// The remote resource that holds the authoritative notes.
pub trait NotesProvider {
    fn list_notes(&self) -> Result<Vec<NoteEntry>, RemoteError>;
    fn create_note(&self, draft: &NoteDraft) -> Result<NoteEntry, RemoteError>;
    fn delete_note(&self, id: &str) -> Result<(), RemoteError>;
}
