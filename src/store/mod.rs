//! Note storage subsystem.
//!
//! # Design Decisions
//! - In-memory only; contents are lost on restart
//! - A single `RwLock` guards the store, held for one operation at a time
//! - Validation happens at the boundary (`NoteInput::validate`), not in the store

pub mod memory;
pub mod note;
pub mod pagination;

pub use memory::NoteStore;
pub use note::{Note, NoteInput, NoteValidationError};
pub use pagination::{paginate, Page, PageParams};
