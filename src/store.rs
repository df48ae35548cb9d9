use std::fmt;

use chrono::{DateTime, Local};
use log::{debug, info, warn};

use crate::error::NotesError;
use crate::note_entry::{NoteDraft, NoteEntry};
use crate::providers::provider::NotesProvider;

/// Confirmed changes to the collection, sent to the store's listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Refreshed { count: usize },
    Added(NoteEntry),
    Removed { id: String },
}

impl fmt::Display for StoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreEvent::Refreshed { count } => write!(f, "Loaded {} notes", count),
            StoreEvent::Added(note) => write!(f, "Added \"{}\"", note.title),
            StoreEvent::Removed { id } => write!(f, "Deleted note {}", id),
        }
    }
}

pub type StoreListener = Box<dyn FnMut(&StoreEvent)>;

/// Owns the in-memory notes and keeps them in line with the remote.
///
/// The collection only changes after the matching remote call succeeds, so a
/// failed call leaves it exactly as it was.
pub struct NoteStore<P: NotesProvider> {
    provider: P,
    notes: Vec<NoteEntry>,
    last_synced: Option<DateTime<Local>>,
    listener: Option<StoreListener>,
}

impl<P: NotesProvider> NoteStore<P> {
    pub fn new(provider: P) -> Self {
        NoteStore {
            provider,
            notes: Vec::new(),
            last_synced: None,
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: StoreListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn notes(&self) -> &[NoteEntry] {
        &self.notes
    }

    pub fn last_synced(&self) -> Option<DateTime<Local>> {
        self.last_synced
    }

    /// Replace the collection with whatever the remote holds now.
    pub fn refresh(&mut self) -> Result<&[NoteEntry], NotesError> {
        let notes = self.provider.list_notes()?;
        info!("fetched {} notes", notes.len());

        self.notes = notes;
        self.last_synced = Some(Local::now());
        self.emit(StoreEvent::Refreshed {
            count: self.notes.len(),
        });
        Ok(&self.notes)
    }

    pub fn add(&mut self, title: &str, description: &str) -> Result<NoteEntry, NotesError> {
        let draft = NoteDraft::new(title, description).inspect_err(|e| debug!("{}", e))?;
        let created = self.provider.create_note(&draft)?;
        info!("created note {}", created.id);

        self.notes.push(created.clone());
        self.emit(StoreEvent::Added(created.clone()));
        Ok(created)
    }

    pub fn remove(&mut self, id: &str) -> Result<(), NotesError> {
        if let Err(err) = self.provider.delete_note(id) {
            if err.is_not_found() {
                warn!("note {} was already gone on the remote", id);
                return Err(NotesError::NotFound { id: id.to_owned() });
            }
            return Err(err.into());
        }
        info!("deleted note {}", id);

        self.notes.retain(|note| note.id != id);
        self.emit(StoreEvent::Removed { id: id.to_owned() });
        Ok(())
    }

    fn emit(&mut self, event: StoreEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }
}

#[cfg(test)]
impl<P: NotesProvider> NoteStore<P> {
    pub fn get(&self, id: &str) -> Option<&NoteEntry> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{Operation, RemoteCause, RemoteError, ValidationError};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// In-memory remote with call counters and switchable failures.
    #[derive(Default)]
    pub(crate) struct StubProvider {
        pub remote: RefCell<Vec<NoteEntry>>,
        pub next_id: Cell<u32>,
        pub fail: Cell<bool>,
        pub list_calls: Cell<u32>,
        pub create_calls: Cell<u32>,
        pub delete_calls: Cell<u32>,
    }

    impl StubProvider {
        pub(crate) fn with_notes(notes: Vec<NoteEntry>) -> Self {
            let stub = StubProvider::default();
            stub.remote.replace(notes);
            stub
        }

        fn failure(&self, operation: Operation) -> Result<(), RemoteError> {
            if self.fail.get() {
                return Err(RemoteError::new(
                    operation,
                    RemoteCause::Status {
                        status: 500,
                        body: String::from("down"),
                    },
                ));
            }
            Ok(())
        }
    }

    impl NotesProvider for StubProvider {
        fn list_notes(&self) -> Result<Vec<NoteEntry>, RemoteError> {
            self.list_calls.set(self.list_calls.get() + 1);
            self.failure(Operation::List)?;
            Ok(self.remote.borrow().clone())
        }

        fn create_note(&self, draft: &NoteDraft) -> Result<NoteEntry, RemoteError> {
            self.create_calls.set(self.create_calls.get() + 1);
            self.failure(Operation::Create)?;
            self.next_id.set(self.next_id.get() + 1);
            let note = NoteEntry::new(
                self.next_id.get().to_string(),
                draft.title().to_owned(),
                draft.description().to_owned(),
            );
            self.remote.borrow_mut().push(note.clone());
            Ok(note)
        }

        fn delete_note(&self, id: &str) -> Result<(), RemoteError> {
            self.delete_calls.set(self.delete_calls.get() + 1);
            self.failure(Operation::Delete)?;
            let mut remote = self.remote.borrow_mut();
            let before = remote.len();
            remote.retain(|note| note.id != id);
            if remote.len() == before {
                return Err(RemoteError::new(
                    Operation::Delete,
                    RemoteCause::Status {
                        status: 404,
                        body: String::new(),
                    },
                ));
            }
            Ok(())
        }
    }

    fn note(id: &str, title: &str) -> NoteEntry {
        NoteEntry::new(id.into(), title.into(), format!("about {}", title))
    }

    #[test]
    fn empty_fields_never_reach_the_remote() {
        let mut store = NoteStore::new(StubProvider::default());

        let err = store.add("", "x").unwrap_err();
        assert!(matches!(err, NotesError::Validation(ValidationError::EmptyTitle)));
        let err = store.add("x", "").unwrap_err();
        assert!(matches!(
            err,
            NotesError::Validation(ValidationError::EmptyDescription)
        ));

        assert_eq!(store.provider().create_calls.get(), 0);
        assert_eq!(store.notes().len(), 0);
    }

    #[test]
    fn add_appends_the_echoed_record() {
        let mut store = NoteStore::new(StubProvider::with_notes(vec![note("a", "A")]));
        store.refresh().unwrap();

        let created = store.add("T", "D").unwrap();
        assert_eq!(created.id, "1");
        assert_eq!(store.notes().len(), 2);
        assert_eq!(store.notes().last(), Some(&created));
        assert_eq!(store.get("1").map(|n| n.title.as_str()), Some("T"));
    }

    #[test]
    fn remove_drops_exactly_one_note() {
        let mut store = NoteStore::new(StubProvider::default());
        store.add("T", "D").unwrap();
        store.add("U", "E").unwrap();
        let total = store.notes().len();

        store.remove("1").unwrap();
        assert_eq!(store.notes().len(), total - 1);
        assert!(store.get("1").is_none());
        assert!(store.get("2").is_some());
    }

    #[test]
    fn remove_of_unknown_id_follows_the_remote() {
        let mut store = NoteStore::new(StubProvider::with_notes(vec![note("a", "A")]));
        store.refresh().unwrap();

        let err = store.remove("zzz").unwrap_err();
        assert!(matches!(err, NotesError::NotFound { ref id } if id == "zzz"));
        assert_eq!(store.provider().delete_calls.get(), 1);
        assert_eq!(store.notes().len(), 1);
    }

    #[test]
    fn refresh_replaces_instead_of_merging() {
        let stub = StubProvider::with_notes(vec![note("a", "A"), note("b", "B")]);
        let mut store = NoteStore::new(stub);
        store.refresh().unwrap();
        assert_eq!(store.notes().len(), 2);

        store
            .provider()
            .remote
            .replace(vec![note("c", "C")]);
        store.refresh().unwrap();
        assert_eq!(store.notes(), &[note("c", "C")]);
        assert_eq!(store.provider().list_calls.get(), 2);
        assert!(store.last_synced().is_some());
    }

    #[test]
    fn failed_calls_leave_the_collection_alone() {
        let mut store = NoteStore::new(StubProvider::with_notes(vec![note("a", "A"), note("b", "B")]));
        store.refresh().unwrap();
        let before = store.notes().to_vec();
        let synced_at = store.last_synced();

        store.provider().fail.set(true);

        let err = store.refresh().unwrap_err();
        assert!(matches!(err, NotesError::Remote(ref e) if e.operation == Operation::List));
        assert_eq!(store.notes(), before.as_slice());
        assert_eq!(store.last_synced(), synced_at);

        let err = store.add("T", "D").unwrap_err();
        assert!(matches!(err, NotesError::Remote(ref e) if e.operation == Operation::Create));
        assert_eq!(store.notes(), before.as_slice());

        let err = store.remove("a").unwrap_err();
        assert!(matches!(err, NotesError::Remote(ref e) if e.operation == Operation::Delete));
        assert_eq!(store.notes(), before.as_slice());
    }

    #[test]
    fn listener_sees_only_confirmed_changes() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let mut store = NoteStore::new(StubProvider::default())
            .with_listener(Box::new(move |event: &StoreEvent| sink.borrow_mut().push(event.clone())));

        store.refresh().unwrap();
        let created = store.add("T", "D").unwrap();
        let _ = store.add("", "D");
        store.provider().fail.set(true);
        let _ = store.remove("1");
        store.provider().fail.set(false);
        store.remove("1").unwrap();

        assert_eq!(events.borrow()[1].to_string(), "Added \"T\"");
        assert_eq!(
            *events.borrow(),
            vec![
                StoreEvent::Refreshed { count: 0 },
                StoreEvent::Added(created),
                StoreEvent::Removed { id: "1".into() },
            ]
        );
    }
}
