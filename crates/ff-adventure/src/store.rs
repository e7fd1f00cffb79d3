//! Durable storage for adventure snapshots.
//!
//! A store holds a single snapshot document as text. [`FileStore`] writes it
//! to disk; [`MemoryStore`] keeps it in memory for tests and can be told to
//! fail, to exercise the persistence error paths.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AdventureError, AdventureResult};

/// A place to keep the current snapshot.
pub trait SaveStore {
    /// Read the stored snapshot, or `None` if nothing has been saved.
    fn load(&self) -> AdventureResult<Option<String>>;

    /// Replace the stored snapshot.
    fn save(&mut self, snapshot: &str) -> AdventureResult<()>;

    /// Whether a snapshot exists.
    fn has_save(&self) -> bool;
}

/// Snapshot kept in one JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Use the given file. It is created on the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn failure(&self, action: &str, e: std::io::Error) -> AdventureError {
        AdventureError::Persistence(format!("{action} {}: {e}", self.path.display()))
    }
}

impl SaveStore for FileStore {
    fn load(&self) -> AdventureResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| self.failure("reading", e))?;
        tracing::debug!(path = %self.path.display(), bytes = raw.len(), "snapshot loaded");
        Ok(Some(raw))
    }

    fn save(&mut self, snapshot: &str) -> AdventureResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.failure("creating directory for", e))?;
        }

        // Write to a sibling temp file, then rename over the old snapshot.
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, snapshot).map_err(|e| self.failure("writing", e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| self.failure("replacing", e))?;

        tracing::debug!(path = %self.path.display(), bytes = snapshot.len(), "snapshot saved");
        Ok(())
    }

    fn has_save(&self) -> bool {
        self.path.is_file()
    }
}

/// Snapshot kept in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Option<String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a snapshot.
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            snapshot: Some(snapshot.into()),
            ..Self::default()
        }
    }

    /// Make every read fail.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Make subsequent writes fail, or succeed again.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// The stored snapshot text.
    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }
}

impl SaveStore for MemoryStore {
    fn load(&self) -> AdventureResult<Option<String>> {
        if self.fail_reads {
            return Err(AdventureError::Persistence(
                "memory store read refused".to_string(),
            ));
        }
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &str) -> AdventureResult<()> {
        if self.fail_writes {
            return Err(AdventureError::Persistence(
                "memory store write refused".to_string(),
            ));
        }
        self.snapshot = Some(snapshot.to_string());
        Ok(())
    }

    fn has_save(&self) -> bool {
        self.snapshot.is_some()
    }
}
