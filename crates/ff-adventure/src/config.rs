//! Configuration for an adventure session.

use std::path::PathBuf;

/// File name of the save document inside the data directory.
pub const SAVE_FILE_NAME: &str = "ff_manager_state_v1.json";

/// Configuration for an adventure session.
#[derive(Debug, Clone, Default)]
pub struct AdventureConfig {
    /// RNG seed for reproducible rolls. OS entropy when unset.
    pub seed: Option<u64>,
    /// Snapshot file. The platform data directory when unset.
    pub save_path: Option<PathBuf>,
}

impl AdventureConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the snapshot file.
    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(path.into());
        self
    }

    /// The snapshot file to use: the configured one, or the default.
    pub fn resolved_save_path(&self) -> PathBuf {
        self.save_path.clone().unwrap_or_else(default_save_path)
    }
}

/// `<data dir>/ff_manager_state_v1.json`, following platform conventions:
/// - Linux: `~/.local/share/ff-manager`
/// - macOS: `~/Library/Application Support/ff-manager`
/// - Windows: `%APPDATA%\ff-manager`
/// - Fallback: `./save_data`
pub fn default_save_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "ff-manager")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
        .join(SAVE_FILE_NAME)
}
