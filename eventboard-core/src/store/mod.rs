//! Persistence of the whole event collection.
//!
//! A store holds exactly one document: the full list of events. There is no
//! partial update path; callers load everything, mutate in memory and save
//! everything back.

mod file;
mod memory;

pub use file::{FileStore, WriteMode};
pub use memory::MemoryStore;

use crate::error::{PersistenceError, SaveOutcome};
use crate::event::Event;

/// Backing storage for the event collection.
pub trait EventStore: Send + Sync {
    /// Read the full collection.
    ///
    /// Missing, blank and corrupt documents all come back as an empty list;
    /// only I/O failures are errors.
    fn load(&self) -> Result<Vec<Event>, PersistenceError>;

    /// Replace the stored collection with `events`.
    ///
    /// Failures are logged and reported as [`SaveOutcome::Diverged`], never
    /// raised.
    fn save(&self, events: &[Event]) -> SaveOutcome;
}
