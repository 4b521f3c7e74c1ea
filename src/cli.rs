//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI parser for `amdcfg`.
#[derive(Debug, Parser)]
#[command(
    name = "amdcfg",
    version,
    about = "Generate loader configuration from AMD-style module definitions"
)]
pub struct Cli {
    /// Files or directories to scan for module registrations.
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Variable name that receives the generated configuration.
    #[arg(long, default_value = "__CONFIG__", value_name = "NAME")]
    pub config: String,

    /// File whose content is prepended to the generated configuration.
    #[arg(long, value_name = "FILE")]
    pub base: Option<PathBuf>,

    /// Write the generated configuration to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Glob applied to files found while scanning directories.
    #[arg(long, default_value = "**/*.js", value_name = "GLOB")]
    pub file_pattern: String,

    /// Root folder stripped from file paths when deriving module names.
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub module_root: PathBuf,

    /// Package descriptor path (or inline JSON object) providing the module
    /// name prefix.
    #[arg(long, value_name = "PATH|JSON")]
    pub module_config: Option<String>,

    /// Extension to strip from file names instead of the real one.
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Keep file extensions in derived module names.
    #[arg(long)]
    pub keep_extension: bool,

    /// Regex transformation applied to derived names, as a JavaScript-style
    /// `/pattern/flags` pair followed by the replacement.
    #[arg(long, num_args = 2, value_names = ["PATTERN", "REPLACEMENT"])]
    pub format: Option<Vec<String>>,

    /// Lower-case derived module names.
    #[arg(long)]
    pub lower_case: bool,

    /// Omit path metadata from the generated configuration.
    #[arg(long)]
    pub ignore_path: bool,

    /// Never write rewritten module files back to disk.
    #[arg(long)]
    pub skip_file_override: bool,

    /// Namespace object prefixed onto registration calls (e.g. `Loader`).
    #[arg(long, value_name = "NAME")]
    pub namespace: Option<String>,

    /// External parser command producing ESTree JSON with ranges for a file.
    #[arg(long, default_value = "esparse --range", value_name = "CMD")]
    pub parser: String,
}
