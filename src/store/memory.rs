//! In-memory note store.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::store::note::{Note, NoteInput};

#[derive(Debug, Default)]
struct Inner {
    notes: Vec<Note>,
    next_id: u64,
}

/// Thread-safe note store. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct NoteStore {
    inner: RwLock<Inner>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave `Inner` half-updated:
    // every mutation is a single push, assignment or remove.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a note and return it with its assigned id.
    pub fn create(&self, input: NoteInput) -> Note {
        let mut inner = self.write();
        inner.next_id += 1;
        let note = Note {
            id: inner.next_id,
            title: input.title,
            body: input.body,
        };
        inner.notes.push(note.clone());
        note
    }

    /// All notes, newest first.
    pub fn list(&self) -> Vec<Note> {
        self.read().notes.iter().rev().cloned().collect()
    }

    /// Case-insensitive substring match over title and body, newest first.
    pub fn search(&self, query: &str) -> Vec<Note> {
        let needle = query.to_lowercase();
        self.read()
            .notes
            .iter()
            .rev()
            .filter(|n| {
                n.title.to_lowercase().contains(&needle) || n.body.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub fn get(&self, id: u64) -> Option<Note> {
        self.read().notes.iter().find(|n| n.id == id).cloned()
    }

    /// Replace title and body of an existing note.
    pub fn update(&self, id: u64, input: NoteInput) -> Option<Note> {
        let mut inner = self.write();
        let note = inner.notes.iter_mut().find(|n| n.id == id)?;
        note.title = input.title;
        note.body = input.body;
        Some(note.clone())
    }

    /// Remove a note. Returns whether it existed.
    pub fn delete(&self, id: u64) -> bool {
        let mut inner = self.write();
        match inner.notes.iter().position(|n| n.id == id) {
            Some(idx) => {
                inner.notes.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.read().notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
