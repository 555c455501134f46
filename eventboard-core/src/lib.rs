//! Core types for eventboard.
//!
//! This crate owns everything below the HTTP layer:
//! - `Event` and `EventDraft` for the stored records and client input
//! - `store` for persisting the whole collection as one JSON document
//! - `repository` for the pure operations applied between a load and a save
//! - `EventBoard` for the load/mutate/save cycle the server runs per request

pub mod board;
pub mod config;
pub mod error;
pub mod event;
pub mod id;
pub mod repository;
pub mod store;

pub use crate::board::EventBoard;
pub use crate::config::BoardConfig;
pub use crate::error::{EventError, EventResult, PersistenceError, SaveOutcome};
pub use crate::event::{Event, EventDraft, EventFields};
pub use crate::id::{AsEventId, EventId};
pub use crate::repository::IdAssignment;
pub use crate::store::{EventStore, FileStore, MemoryStore, WriteMode};
