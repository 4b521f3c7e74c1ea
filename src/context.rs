//! Service context bundling all port trait objects.

use crate::adapters::live::{LiveFileSystem, LiveFileWalker, ProcessParser};
use crate::ports::filesystem::FileSystem;
use crate::ports::parser::SourceParser;
use crate::ports::walker::FileWalker;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. The live
/// constructor wires up real adapters; tests build the struct directly with
/// in-memory adapters.
pub struct ServiceContext {
    /// Filesystem for file I/O.
    pub fs: Box<dyn FileSystem>,
    /// Parser turning source text into trees.
    pub parser: Box<dyn SourceParser>,
    /// Walker expanding directory arguments into file lists.
    pub walker: Box<dyn FileWalker>,
}

impl ServiceContext {
    /// Creates a live context: real disk I/O, the external parser process,
    /// and the glob-filtering directory walker.
    #[must_use]
    pub fn live(parser_command: &[String]) -> Self {
        Self {
            fs: Box::new(LiveFileSystem),
            parser: Box::new(ProcessParser::new(parser_command)),
            walker: Box::new(LiveFileWalker),
        }
    }

    /// Creates a context from explicit port implementations.
    #[must_use]
    pub fn new(
        fs: Box<dyn FileSystem>,
        parser: Box<dyn SourceParser>,
        walker: Box<dyn FileWalker>,
    ) -> Self {
        Self { fs, parser, walker }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemoryFileSystem, MemoryParser, MemoryWalker};
    use std::path::Path;

    #[test]
    fn context_dispatches_to_the_configured_adapters() {
        let fs = MemoryFileSystem::new();
        fs.insert("js/a.js", "define();");

        let ctx = ServiceContext::new(
            Box::new(fs),
            Box::new(MemoryParser::new()),
            Box::new(MemoryWalker::new()),
        );
        assert_eq!(ctx.fs.read_to_string(Path::new("js/a.js")).unwrap(), "define();");
        // Unregistered trees surface as parse failures.
        assert!(ctx.parser.parse(Path::new("js/a.js"), "define();").is_err());
    }
}
