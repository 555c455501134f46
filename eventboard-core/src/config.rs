//! Board configuration.
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file,
//! `EVENTBOARD_*` environment variables, then the bare `PORT` variable.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, Source};
use serde::Deserialize;

use crate::error::{EventError, EventResult};
use crate::repository::IdAssignment;
use crate::store::{FileStore, WriteMode};

static DEFAULT_DATA_FILE: &str = "events.json";
static DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const ENV_PREFIX: &str = "EVENTBOARD";

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Configuration for the event board and the server in front of it.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BoardConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Path of the JSON document; `~` is expanded.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Replace the document through a temp file and rename.
    #[serde(default)]
    pub atomic_writes: bool,

    /// Run each load/mutate/save cycle under a lock.
    #[serde(default)]
    pub serialize_writes: bool,

    /// Fail requests whose save did not reach disk instead of logging and
    /// carrying on.
    #[serde(default)]
    pub strict_writes: bool,

    #[serde(default)]
    pub id_assignment: IdAssignment,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            host: default_host(),
            port: default_port(),
            data_file: default_data_file(),
            atomic_writes: false,
            serialize_writes: false,
            strict_writes: false,
            id_assignment: IdAssignment::default(),
        }
    }
}

fn config_error(err: config::ConfigError) -> EventError {
    EventError::Config(err.to_string())
}

/// `PORT` wins over every other source unless it is unset or empty.
fn port_override(value: Option<String>) -> Option<String> {
    value.filter(|port| !port.trim().is_empty())
}

impl BoardConfig {
    /// Default config file location: `~/.config/eventboard/config.toml`.
    pub fn config_path() -> EventResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EventError::Config("Could not determine config directory".into()))?
            .join("eventboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path` if given (it must exist), else from the default
    /// location if present, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> EventResult<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Self::config_path()?).required(false),
        };

        Self::from_sources(
            file,
            Environment::with_prefix(ENV_PREFIX),
            port_override(std::env::var("PORT").ok()),
        )
    }

    fn from_sources(
        file: impl Source + Send + Sync + 'static,
        env: Environment,
        port: Option<String>,
    ) -> EventResult<Self> {
        let mut builder = Config::builder()
            .add_source(file)
            .add_source(env.try_parsing(true));

        if let Some(port) = port {
            builder = builder.set_override("port", port).map_err(config_error)?;
        }

        builder
            .build()
            .map_err(config_error)?
            .try_deserialize()
            .map_err(config_error)
    }

    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_file.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn write_mode(&self) -> WriteMode {
        if self.atomic_writes {
            WriteMode::Atomic
        } else {
            WriteMode::Overwrite
        }
    }

    pub fn file_store(&self) -> FileStore {
        FileStore::new(self.data_path()).with_mode(self.write_mode())
    }
}
