//! In-memory filesystem adapter.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::ports::filesystem::FileSystem;

#[derive(Debug, Default)]
struct Inner {
    files: Mutex<HashMap<PathBuf, String>>,
    writes: Mutex<Vec<PathBuf>>,
}

/// Filesystem adapter holding files in memory and recording every write.
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    inner: Arc<Inner>,
}

impl MemoryFileSystem {
    /// Creates an empty in-memory filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file with the given contents.
    pub fn insert(&self, path: impl AsRef<Path>, contents: &str) {
        if let Ok(mut files) = self.inner.files.lock() {
            files.insert(path.as_ref().to_path_buf(), contents.to_string());
        }
    }

    /// Removes a file.
    pub fn remove(&self, path: impl AsRef<Path>) {
        if let Ok(mut files) = self.inner.files.lock() {
            files.remove(path.as_ref());
        }
    }

    /// Returns the current contents of a file, if present.
    #[must_use]
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.inner.files.lock().ok()?.get(path.as_ref()).cloned()
    }

    /// Returns the paths written through the port, in write order.
    #[must_use]
    pub fn write_log(&self) -> Vec<PathBuf> {
        self.inner.writes.lock().map(|writes| writes.clone()).unwrap_or_default()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.contents(path)
            .ok_or_else(|| format!("no such file: {}", path.display()).into())
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut files =
            self.inner.files.lock().map_err(|_| "memory filesystem poisoned".to_string())?;
        files.insert(path.to_path_buf(), contents.to_string());
        drop(files);
        let mut writes =
            self.inner.writes.lock().map_err(|_| "memory filesystem poisoned".to_string())?;
        writes.push(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.contents(path).is_some() || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .files
            .lock()
            .map(|files| files.keys().any(|file| file.as_path() != path && file.starts_with(path)))
            .unwrap_or(false)
    }
}
