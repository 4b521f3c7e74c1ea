//! Core library entry for the `amdcfg` CLI.

pub mod adapters;
pub mod analyze;
pub mod ast;
pub mod cli;
pub mod commands;
pub mod context;
pub mod manifest;
pub mod naming;
pub mod options;
pub mod pipeline;
pub mod ports;
pub mod rewrite;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or the generation
/// run fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err)
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) =>
        {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    let options = options::resolve(cli)?;
    commands::generate::run(options)
}
