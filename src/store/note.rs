//! Note types and input validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum title length, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

/// Maximum body length, in characters.
pub const MAX_BODY_CHARS: usize = 10_000;

/// A stored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub title: String,
    pub body: String,
}

/// Payload for creating or fully replacing a note.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NoteInput {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

impl NoteInput {
    /// Enforce the length bounds on both fields.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        check_len("title", &self.title, MAX_TITLE_CHARS)?;
        check_len("body", &self.body, MAX_BODY_CHARS)
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), NoteValidationError> {
    if value.is_empty() {
        return Err(NoteValidationError::Empty { field });
    }
    if value.chars().count() > max {
        return Err(NoteValidationError::TooLong { field, max });
    }
    Ok(())
}
