//! Singleton guard so only one eventboard-server serves a given events document.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// A lock guard that releases the lock when dropped
pub struct LockGuard {
    _file: File,
}

fn lock_path(data_path: &Path) -> PathBuf {
    let mut name = data_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "events.json".into());
    name.push(".lock");
    data_path.with_file_name(name)
}

/// Acquire an exclusive lock next to the events document, failing if another
/// instance already holds it
pub fn acquire_lock(data_path: &Path) -> Result<LockGuard> {
    let path = lock_path(data_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let file = File::create(&path).context("Failed to create lock file")?;

    file.try_lock_exclusive().map_err(|_| {
        anyhow::anyhow!(
            "Another eventboard-server instance is already serving {}.\n\
            If you believe this is an error, remove: {}",
            data_path.display(),
            path.display()
        )
    })?;

    Ok(LockGuard { _file: file })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_path_sits_next_to_document() {
        assert_eq!(
            lock_path(Path::new("/srv/data/events.json")),
            PathBuf::from("/srv/data/events.json.lock")
        );
    }

    #[test]
    fn test_second_lock_on_same_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("events.json");

        let first = acquire_lock(&data).unwrap();
        assert!(acquire_lock(&data).is_err());

        drop(first);
        assert!(acquire_lock(&data).is_ok());
    }
}
