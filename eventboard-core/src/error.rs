//! Error types for eventboard.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in event operations.
#[derive(Error, Debug)]
pub enum EventError {
    /// A required field was missing or empty.
    #[error("{message}")]
    Validation { message: String },

    /// No event matches the requested id.
    #[error("Event not found: {id}")]
    NotFound { id: String },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EventError {
    pub fn validation(message: impl Into<String>) -> Self {
        EventError::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(id: impl ToString) -> Self {
        EventError::NotFound { id: id.to_string() }
    }
}

/// Failures reading or writing the backing document.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not serialize events: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result of `EventStore::save`.
///
/// A save never raises to the caller. When it fails, the caller has already
/// mutated its in-memory collection, so memory and disk now disagree:
/// `Diverged` carries the failure so callers can decide whether to care.
#[derive(Debug)]
#[must_use]
pub enum SaveOutcome {
    Written,
    Diverged(PersistenceError),
}

impl SaveOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, SaveOutcome::Written)
    }

    /// Turn a divergence back into an error.
    pub fn into_result(self) -> Result<(), PersistenceError> {
        match self {
            SaveOutcome::Written => Ok(()),
            SaveOutcome::Diverged(err) => Err(err),
        }
    }
}

/// Result type alias for event operations.
pub type EventResult<T> = Result<T, EventError>;
