//! Live parser adapter invoking an external parser process.

use std::path::Path;
use std::process::Command;

use crate::ast::{estree, Program};
use crate::ports::parser::SourceParser;

/// Parser adapter that runs an external command for each file.
///
/// The command receives the file path as its final argument and must print
/// an ESTree JSON `Program` with `range` information to stdout, the protocol
/// of `esparse --range`.
pub struct ProcessParser {
    command: Vec<String>,
}

impl ProcessParser {
    /// Creates a parser adapter for the given command line.
    #[must_use]
    pub fn new(command: &[String]) -> Self {
        Self { command: command.to_vec() }
    }
}

impl SourceParser for ProcessParser {
    fn parse(
        &self,
        path: &Path,
        _source: &str,
    ) -> Result<Program, Box<dyn std::error::Error + Send + Sync>> {
        let Some((program, args)) = self.command.split_first() else {
            return Err("parser command is empty".into());
        };

        let output = Command::new(program)
            .args(args)
            .arg(path)
            .output()
            .map_err(|e| format!("failed to run parser `{program}`: {e}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "parser `{program}` failed on {}: {}",
                path.display(),
                stderr.trim()
            )
            .into());
        }

        let document: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| format!("parser `{program}` emitted invalid JSON: {e}"))?;
        Ok(estree::program(&document)?)
    }
}
