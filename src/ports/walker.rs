//! Directory walker port for input expansion.

use std::path::{Path, PathBuf};

/// Walks a directory tree and yields the files matching a glob pattern.
///
/// Traversal order must be deterministic so the generated configuration is
/// reproducible across runs.
pub trait FileWalker: Send + Sync {
    /// Returns the files under `dir` matching `pattern`, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be walked or the pattern is
    /// invalid.
    fn walk(
        &self,
        dir: &Path,
        pattern: &str,
    ) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>>;
}
