//! The load/mutate/save cycle.
//!
//! Every call reloads the whole collection from the store. Mutations apply
//! one repository operation and write the whole collection back. Nothing is
//! cached between calls, so the store's document is the only source of truth.

use std::sync::{Arc, Mutex, PoisonError};

use crate::config::BoardConfig;
use crate::error::{EventError, EventResult};
use crate::event::{Event, EventDraft};
use crate::repository::{self, IdAssignment};
use crate::store::EventStore;

pub struct EventBoard {
    store: Arc<dyn EventStore>,
    ids: IdAssignment,
    /// Present when writes are serialized. Without it two concurrent
    /// mutations can interleave and the later save wins.
    write_lock: Option<Mutex<()>>,
    strict_writes: bool,
}

impl EventBoard {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        EventBoard {
            store,
            ids: IdAssignment::default(),
            write_lock: None,
            strict_writes: false,
        }
    }

    /// Board over the configured JSON document.
    pub fn from_config(config: &BoardConfig) -> Self {
        EventBoard::new(Arc::new(config.file_store()))
            .with_id_assignment(config.id_assignment)
            .serialize_writes(config.serialize_writes)
            .strict_writes(config.strict_writes)
    }

    pub fn with_id_assignment(mut self, ids: IdAssignment) -> Self {
        self.ids = ids;
        self
    }

    pub fn serialize_writes(mut self, enabled: bool) -> Self {
        self.write_lock = enabled.then(|| Mutex::new(()));
        self
    }

    pub fn strict_writes(mut self, enabled: bool) -> Self {
        self.strict_writes = enabled;
        self
    }

    pub fn list(&self) -> EventResult<Vec<Event>> {
        Ok(self.store.load()?)
    }

    pub fn get(&self, id: &str) -> EventResult<Event> {
        let events = self.store.load()?;
        repository::find_by_id(&events, id)
            .cloned()
            .ok_or_else(|| EventError::not_found(id))
    }

    pub fn create(&self, draft: EventDraft) -> EventResult<Event> {
        let ids = self.ids;
        self.mutate(|events| repository::create(events, draft, ids))
    }

    pub fn update(&self, id: &str, draft: EventDraft) -> EventResult<Event> {
        self.mutate(|events| repository::update(events, id, draft))
    }

    pub fn remove(&self, id: &str) -> EventResult<Event> {
        self.mutate(|events| repository::remove(events, id))
    }

    pub fn add_rsvp(&self, id: &str, name: Option<String>) -> EventResult<Event> {
        self.mutate(|events| repository::add_rsvp(events, id, name))
    }

    /// Load, apply `op`, and save only if `op` succeeded.
    fn mutate<T>(&self, op: impl FnOnce(&mut Vec<Event>) -> EventResult<T>) -> EventResult<T> {
        let _guard = self
            .write_lock
            .as_ref()
            .map(|lock| lock.lock().unwrap_or_else(PoisonError::into_inner));

        let mut events = self.store.load()?;
        let value = op(&mut events)?;

        if let Err(err) = self.store.save(&events).into_result() {
            if self.strict_writes {
                return Err(err.into());
            }
            tracing::warn!(error = %err, "Continuing with unsaved changes");
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PersistenceError, SaveOutcome};
    use crate::id::EventId;
    use crate::store::{FileStore, MemoryStore};
    use std::path::PathBuf;
    use std::thread;

    /// Loads from an inner store but never manages to save.
    struct ReadOnlyStore(MemoryStore);

    impl EventStore for ReadOnlyStore {
        fn load(&self) -> Result<Vec<Event>, PersistenceError> {
            self.0.load()
        }

        fn save(&self, _events: &[Event]) -> SaveOutcome {
            SaveOutcome::Diverged(PersistenceError::Write {
                path: PathBuf::from("events.json"),
                source: std::io::Error::other("disk full"),
            })
        }
    }

    fn board() -> (Arc<MemoryStore>, EventBoard) {
        let store = Arc::new(MemoryStore::new());
        let board = EventBoard::new(store.clone());
        (store, board)
    }

    fn draft(name: &str) -> EventDraft {
        EventDraft::new(name, "2024-09-01", "desc")
    }

    #[test]
    fn test_create_persists() {
        let (store, board) = board();

        let created = board.create(draft("Picnic")).unwrap();

        assert_eq!(created.id, EventId::new(1));
        assert_eq!(store.snapshot(), vec![created]);
    }

    #[test]
    fn test_get_normalizes_text_id() {
        let (_store, board) = board();
        board.create(draft("Picnic")).unwrap();

        assert_eq!(board.get("1").unwrap().name, "Picnic");
        assert_eq!(board.get(" 1.0 ").unwrap().name, "Picnic");
        assert!(matches!(board.get("x"), Err(EventError::NotFound { .. })));
    }

    #[test]
    fn test_failed_operation_does_not_save() {
        let (store, board) = board();
        board.create(draft("Picnic")).unwrap();
        let before = store.snapshot();

        assert!(board.update("1", EventDraft::default()).is_err());
        assert!(board.remove("7").is_err());
        assert!(board.add_rsvp("1", None).is_err());

        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_legacy_ids_collide_after_first_event() {
        let (store, board) = board();
        for name in ["A", "B", "C"] {
            board.create(draft(name)).unwrap();
        }

        let ids: Vec<i64> = store.snapshot().iter().map(|e| e.id.get()).collect();
        assert_eq!(ids, vec![1, 1, 2]);

        // Lookups by a duplicated id hit the first match.
        board.add_rsvp("1", Some("Ana".into())).unwrap();
        let events = store.snapshot();
        assert_eq!(events[0].rsvps, vec!["Ana".to_string()]);
        assert!(events[1].rsvps.is_empty());
        assert!(matches!(board.get("3"), Err(EventError::NotFound { .. })));
    }

    #[test]
    fn test_full_lifecycle() {
        let store = Arc::new(MemoryStore::new());
        let board = EventBoard::new(store.clone()).with_id_assignment(IdAssignment::MaxPlusOne);
        for name in ["A", "B", "C"] {
            board.create(draft(name)).unwrap();
        }

        board.update("3", EventDraft::new("C2", "2024-10-10", "moved")).unwrap();
        board.add_rsvp("3", Some("Ana".into())).unwrap();
        let removed = board.remove("1").unwrap();

        assert_eq!(removed.name, "A");
        let events = store.snapshot();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].name, "C2");
        assert_eq!(events[1].rsvps, vec!["Ana".to_string()]);
    }

    #[test]
    fn test_divergent_save_is_swallowed_by_default() {
        let board = EventBoard::new(Arc::new(ReadOnlyStore(MemoryStore::new())));

        let created = board.create(draft("Picnic")).unwrap();

        assert_eq!(created.name, "Picnic");
        assert!(board.list().unwrap().is_empty());
    }

    #[test]
    fn test_strict_writes_surface_divergence() {
        let board =
            EventBoard::new(Arc::new(ReadOnlyStore(MemoryStore::new()))).strict_writes(true);

        let err = board.create(draft("Picnic")).unwrap_err();

        assert!(matches!(
            err,
            EventError::Persistence(PersistenceError::Write { .. })
        ));
    }

    #[test]
    fn test_serialized_writes_keep_every_rsvp() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::new(dir.path().join("events.json")));
        let board = Arc::new(
            EventBoard::new(store.clone())
                .with_id_assignment(IdAssignment::MaxPlusOne)
                .serialize_writes(true),
        );
        board.create(draft("Party")).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let board = Arc::clone(&board);
                thread::spawn(move || board.add_rsvp("1", Some(format!("guest-{i}"))).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(board.get("1").unwrap().rsvps.len(), 8);
    }

    #[test]
    fn test_from_config_uses_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = BoardConfig {
            data_file: dir.path().join("board.json"),
            id_assignment: IdAssignment::MaxPlusOne,
            ..BoardConfig::default()
        };
        let board = EventBoard::from_config(&config);

        board.create(draft("A")).unwrap();
        let second = board.create(draft("B")).unwrap();

        assert_eq!(second.id, EventId::new(2));
        assert!(dir.path().join("board.json").exists());
    }
}
