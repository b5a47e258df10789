//! Configuration for load sessions.

use std::path::PathBuf;

/// Configuration for a [`RemoteLoader`](super::RemoteLoader).
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Directory where asset files are stored, keyed by content key.
    pub updates_dir: PathBuf,

    /// Maximum concurrent asset downloads. Values of 0 are treated as 1.
    pub max_concurrent_downloads: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            updates_dir: std::env::temp_dir().join("updraft"),
            max_concurrent_downloads: 4,
        }
    }
}

impl LoaderConfig {
    /// Create a new configuration with the given updates directory.
    pub fn new(updates_dir: PathBuf) -> Self {
        Self {
            updates_dir,
            ..Default::default()
        }
    }

    /// Set the maximum concurrent downloads.
    pub fn with_max_concurrent_downloads(mut self, max: usize) -> Self {
        self.max_concurrent_downloads = max;
        self
    }

    pub(crate) fn effective_concurrency(&self) -> usize {
        self.max_concurrent_downloads.max(1)
    }
}
