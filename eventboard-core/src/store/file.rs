//! JSON document on disk.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::EventStore;
use crate::error::{PersistenceError, SaveOutcome};
use crate::event::Event;

const EMPTY_DOCUMENT: &str = "[]";

/// How `FileStore` replaces the document on save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate and rewrite the document in place. A crash mid-write can
    /// leave a partial file, which the next load resets to empty.
    #[default]
    Overwrite,
    /// Write a sibling `.tmp` file and rename it over the document.
    Atomic,
}

/// Event collection stored as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    mode: WriteMode,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore {
            path: path.into(),
            mode: WriteMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "events.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_document(&self, contents: &str) -> Result<(), PersistenceError> {
        let write_err = |source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        match self.mode {
            WriteMode::Overwrite => fs::write(&self.path, contents).map_err(write_err),
            WriteMode::Atomic => {
                let temp = self.temp_path();
                fs::write(&temp, contents).map_err(write_err)?;
                fs::rename(&temp, &self.path).map_err(write_err)
            }
        }
    }
}

impl EventStore for FileStore {
    fn load(&self) -> Result<Vec<Event>, PersistenceError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                self.write_document(EMPTY_DOCUMENT)?;
                tracing::info!(path = %self.path.display(), "Created empty events document");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<Event>>(&contents) {
            Ok(events) => Ok(events),
            Err(err) => {
                // Corrupt documents are discarded, not repaired.
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "Events document is unparsable, resetting it to an empty list"
                );
                self.write_document(EMPTY_DOCUMENT)?;
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, events: &[Event]) -> SaveOutcome {
        let result = serde_json::to_string_pretty(events)
            .map_err(PersistenceError::from)
            .and_then(|json| self.write_document(&json));

        match result {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), count = events.len(), "Wrote events");
                SaveOutcome::Written
            }
            Err(err) => {
                tracing::error!(path = %self.path.display(), error = %err, "Failed to write events document");
                SaveOutcome::Diverged(err)
            }
        }
    }
}
