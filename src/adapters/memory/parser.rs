//! In-memory parser adapter serving pre-built trees.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::ast::Program;
use crate::ports::parser::SourceParser;

/// Parser adapter returning trees registered up front, keyed by path.
///
/// Cloning shares the underlying state. Requesting an unregistered path is
/// an error, which surfaces as a parse failure in the pipeline.
#[derive(Debug, Clone, Default)]
pub struct MemoryParser {
    programs: Arc<Mutex<HashMap<PathBuf, Program>>>,
}

impl MemoryParser {
    /// Creates an empty parser.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the tree returned for `path`.
    pub fn insert(&self, path: impl AsRef<Path>, program: Program) {
        if let Ok(mut programs) = self.programs.lock() {
            programs.insert(path.as_ref().to_path_buf(), program);
        }
    }
}

impl SourceParser for MemoryParser {
    fn parse(
        &self,
        path: &Path,
        _source: &str,
    ) -> Result<Program, Box<dyn std::error::Error + Send + Sync>> {
        let programs =
            self.programs.lock().map_err(|_| "memory parser poisoned".to_string())?;
        programs
            .get(path)
            .cloned()
            .ok_or_else(|| format!("no parsed tree registered for {}", path.display()).into())
    }
}
