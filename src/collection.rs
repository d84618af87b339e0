//! The note collection manager.
//!
//! `NoteCollection` is the only writer of note state. Every mutation runs in
//! a fixed order: change memory, persist the whole collection, then notify
//! listeners. A failed save rolls the in-memory change back so memory, the
//! storage slot and anything rendered from notifications stay in step.

use chrono::{DateTime, Utc};
use log::{debug, error, info};

use crate::{
    normalize_field, Change, KeyValueStore, Note, NoteId, NoteStore, NotesError,
    PartialNotePolicy, Result, Selection,
};

/// Callback invoked after each successful change.
pub type Listener = Box<dyn FnMut(&Change, &[Note], &Selection)>;

struct Snapshot {
    notes: Vec<Note>,
    selection: Selection,
    last_id: NoteId,
}

/// Owns the ordered notes, the selection and the persistence adapter.
pub struct NoteCollection<S> {
    store: NoteStore<S>,

    /// Newest first, see `sort_notes`
    notes: Vec<Note>,

    selection: Selection,

    policy: PartialNotePolicy,

    /// Highest id loaded or issued this session, deleted ones included
    last_id: NoteId,

    listeners: Vec<Listener>,
}

impl<S: KeyValueStore> NoteCollection<S> {
    /// Loads the collection from `store`. Unreadable data yields an empty
    /// collection.
    pub fn open(store: NoteStore<S>, policy: PartialNotePolicy) -> Self {
        let mut notes = store.load();
        sort_notes(&mut notes);
        let last_id = notes.iter().map(|note| note.id).max().unwrap_or(0);

        info!(
            "Opened collection with {} notes (partial notes: {:?})",
            notes.len(),
            policy
        );

        Self {
            store,
            notes,
            selection: Selection::none(),
            policy,
            last_id,
            listeners: Vec::new(),
        }
    }

    /// Registers a callback run after every successful change.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Change, &[Note], &Selection) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Creates a note, inserts it and selects it.
    pub fn create(&mut self, title: &str, content: &str) -> Result<Note> {
        let (title, content) = self.validate(title, content)?;

        let now = Utc::now();
        let id = self.next_id(now);
        let note = Note::new(id, title, content, now);

        let snapshot = self.snapshot();
        self.last_id = id;
        self.notes.push(note.clone());
        sort_notes(&mut self.notes);
        self.selection.select(id, &self.notes);

        self.commit(snapshot, Change::Created(id))?;
        info!("Created note {}", id);
        Ok(note)
    }

    /// Overwrites title and content of an existing note. The creation
    /// timestamp and the selection are left alone.
    pub fn update(&mut self, id: NoteId, title: &str, content: &str) -> Result<Note> {
        let (title, content) = self.validate(title, content)?;

        let index = self.position(id)?;
        let snapshot = self.snapshot();
        let note = &mut self.notes[index];
        note.title = title;
        note.content = content;
        let updated = note.clone();

        self.commit(snapshot, Change::Updated(id))?;
        info!("Updated note {}", id);
        Ok(updated)
    }

    /// Removes a note, clearing the selection if it pointed at it. Returns
    /// the removed note.
    pub fn delete(&mut self, id: NoteId) -> Result<Note> {
        let index = self.position(id)?;
        let snapshot = self.snapshot();
        let removed = self.notes.remove(index);
        let selection_cleared = self.selection.forget(id);

        self.commit(
            snapshot,
            Change::Deleted {
                id,
                selection_cleared,
            },
        )?;
        info!("Deleted note {}", id);
        Ok(removed)
    }

    /// All notes, newest first with higher ids first among equal timestamps.
    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Selects `id` if it exists; otherwise nothing happens.
    pub fn select(&mut self, id: NoteId) -> bool {
        if !self.selection.select(id, &self.notes) {
            debug!("Ignoring selection of unknown note {}", id);
            return false;
        }
        self.notify(Change::SelectionChanged(Some(id)));
        true
    }

    pub fn clear_selection(&mut self) {
        if self.selection.active().is_some() {
            self.selection.clear();
            self.notify(Change::SelectionChanged(None));
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.selection.active().and_then(|id| self.get(id))
    }

    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    fn validate(&self, title: &str, content: &str) -> Result<(String, String)> {
        let title = normalize_field(title);
        let content = normalize_field(content);

        match (title.is_empty(), content.is_empty(), self.policy) {
            (true, true, _) => Err(NotesError::EmptyNote),
            (true, false, PartialNotePolicy::Reject) => Err(NotesError::MissingTitle),
            (false, true, PartialNotePolicy::Reject) => Err(NotesError::MissingContent),
            _ => Ok((title, content)),
        }
    }

    fn position(&self, id: NoteId) -> Result<usize> {
        self.notes
            .iter()
            .position(|note| note.id == id)
            .ok_or(NotesError::NoteNotFound { id })
    }

    /// Millisecond timestamp, bumped past every id seen this session.
    fn next_id(&self, now: DateTime<Utc>) -> NoteId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        millis.max(self.last_id.saturating_add(1))
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            notes: self.notes.clone(),
            selection: self.selection,
            last_id: self.last_id,
        }
    }

    fn commit(&mut self, snapshot: Snapshot, change: Change) -> Result<()> {
        if let Err(e) = self.store.save(&self.notes) {
            error!("Failed to persist {:?}, rolling back: {}", change, e);
            self.notes = snapshot.notes;
            self.selection = snapshot.selection;
            self.last_id = snapshot.last_id;
            return Err(e);
        }
        self.notify(change);
        Ok(())
    }

    fn notify(&mut self, change: Change) {
        for listener in self.listeners.iter_mut() {
            listener(&change, &self.notes, &self.selection);
        }
    }
}

/// Creation time descending, id descending among equal timestamps.
pub fn sort_notes(notes: &mut [Note]) {
    notes.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
