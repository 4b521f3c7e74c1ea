//! Parser port producing syntax trees for source files.

use std::path::Path;

use crate::ast::Program;

/// Turns source text into the crate's node tree.
///
/// Parsing itself is an external concern (the live adapter shells out to an
/// ESTree-emitting parser process), so the pipeline only ever sees
/// [`Program`] values with span information intact.
pub trait SourceParser: Send + Sync {
    /// Parses the file at `path` whose content is `source`.
    ///
    /// # Errors
    ///
    /// Returns an error when the source is malformed or the parser output
    /// cannot be bridged; a parse failure aborts the whole run.
    fn parse(
        &self,
        path: &Path,
        source: &str,
    ) -> Result<Program, Box<dyn std::error::Error + Send + Sync>>;
}
