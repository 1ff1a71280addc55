//! JSON file store for the latest snapshot.
//!
//! The snapshot is serialized as one document. A `put` writes the new
//! document next to the old one and renames it into place, so a reader (or
//! a crash mid-write) never leaves a half-written snapshot behind.

use super::AggregateStore;
use crate::error::StoreError;
use crate::models::MarsSnapshot;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes writers so two puts never share the temp file.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

impl AggregateStore for JsonFileStore {
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    async fn put(&self, snapshot: &MarsSnapshot) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        let _guard = self.write_lock.lock().await;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| Self::io_error(dir, e))?;
        }

        let temp = self.temp_path();
        debug!(temp = %temp.display(), bytes = json.len(), "Writing snapshot");
        fs::write(&temp, &json)
            .await
            .map_err(|e| Self::io_error(&temp, e))?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|e| Self::io_error(&self.path, e))?;

        info!(captured_at = %snapshot.captured_at, "Stored snapshot");
        Ok(())
    }

    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    async fn get_latest(&self) -> Result<Option<MarsSnapshot>, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::io_error(&self.path, e)),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}
