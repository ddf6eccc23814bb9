//! Flat-file persistence of the counter record.
//!
//! The record is one comma-separated line (see [`dzikir_core::record`]).
//! Loads and saves are serialized by an async mutex so a save can never
//! interleave with a load.  Saves write a sibling temp file and rename it over
//! the real one, so a crash mid-write leaves the previous state intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dzikir_core::Record;
use tokio::sync::Mutex;

use crate::application::collaborators::{Persistence, PersistenceError};

/// [`Persistence`] backed by a single text file.
#[derive(Debug)]
pub struct FileStatePersistence {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStatePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl Persistence for FileStatePersistence {
    async fn load(&self) -> Result<Record, PersistenceError> {
        let _guard = self.lock.lock().await;
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let record = Record::parse(content.lines().next().unwrap_or_default());
                tracing::debug!(path = %self.path.display(), count = record.current_count, "state loaded");
                Ok(record)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no saved state, starting fresh");
                Ok(Record::default())
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    async fn save(&self, record: &Record) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock().await;
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err(|e| self.io_error(e))?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, record.to_line())
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }
}
