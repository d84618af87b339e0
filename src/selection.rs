use crate::{Note, NoteId};

/// The note currently open in the detail view, if any.
///
/// Holds an id, not the note. `NoteCollection` keeps it pointing at an
/// existing note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    active: Option<NoteId>,
}

impl Selection {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<NoteId> {
        self.active
    }

    pub fn is_selected(&self, id: NoteId) -> bool {
        self.active == Some(id)
    }

    /// Points at `id` when it is one of `notes`; otherwise leaves the
    /// selection as it was. Returns whether the selection now points at `id`.
    pub fn select(&mut self, id: NoteId, notes: &[Note]) -> bool {
        if notes.iter().any(|note| note.id == id) {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Clears the selection if it points at `id`. Returns whether it did.
    pub fn forget(&mut self, id: NoteId) -> bool {
        if self.is_selected(id) {
            self.active = None;
            true
        } else {
            false
        }
    }
}
