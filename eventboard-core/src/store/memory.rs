//! In-memory store, for tests and embedding.

use std::sync::{Mutex, PoisonError};

use super::EventStore;
use crate::error::{PersistenceError, SaveOutcome};
use crate::event::Event;

#[derive(Debug, Default)]
pub struct MemoryStore {
    events: Mutex<Vec<Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        MemoryStore {
            events: Mutex::new(events),
        }
    }

    /// Current contents, as the next `load` would return them.
    pub fn snapshot(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventStore for MemoryStore {
    fn load(&self) -> Result<Vec<Event>, PersistenceError> {
        Ok(self.snapshot())
    }

    fn save(&self, events: &[Event]) -> SaveOutcome {
        *self.events.lock().unwrap_or_else(PoisonError::into_inner) = events.to_vec();
        SaveOutcome::Written
    }
}
