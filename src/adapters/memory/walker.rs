//! In-memory walker adapter serving pre-registered listings.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::ports::walker::FileWalker;

/// Walker adapter returning listings registered up front, keyed by
/// directory. The glob pattern is assumed to have been applied when the
/// listing was registered.
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryWalker {
    listings: Arc<Mutex<HashMap<PathBuf, Vec<PathBuf>>>>,
}

impl MemoryWalker {
    /// Creates an empty walker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the files yielded for `dir`.
    pub fn insert(&self, dir: impl AsRef<Path>, files: Vec<PathBuf>) {
        if let Ok(mut listings) = self.listings.lock() {
            listings.insert(dir.as_ref().to_path_buf(), files);
        }
    }
}

impl FileWalker for MemoryWalker {
    fn walk(
        &self,
        dir: &Path,
        _pattern: &str,
    ) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>> {
        let listings =
            self.listings.lock().map_err(|_| "memory walker poisoned".to_string())?;
        listings
            .get(dir)
            .cloned()
            .ok_or_else(|| format!("no listing registered for {}", dir.display()).into())
    }
}
