//! Generation options, resolved once before any file is processed.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::cli::Cli;

/// A compiled `format` transformation: a JavaScript-style `/pattern/flags`
/// regex plus a replacement string, applied to derived base names.
#[derive(Debug, Clone)]
pub struct NameFormat {
    regex: Regex,
    replacement: String,
    global: bool,
}

impl NameFormat {
    /// Compiles a `/pattern/flags` pair into a [`NameFormat`].
    ///
    /// Supported flags: `g` (replace all), `i`, `m`, `s` (inline regex
    /// flags).
    ///
    /// # Errors
    ///
    /// Returns an error when the pattern is not `/…/flags` shaped, uses an
    /// unsupported flag, or fails to compile.
    pub fn parse(pattern: &str, replacement: &str) -> Result<Self, String> {
        let malformed =
            || format!("invalid format pattern `{pattern}`: expected /pattern/flags");
        let body = pattern.strip_prefix('/').ok_or_else(malformed)?;
        let (source, flags) = body.rsplit_once('/').ok_or_else(malformed)?;

        let mut global = false;
        let mut inline = String::new();
        for flag in flags.chars() {
            match flag {
                'g' => global = true,
                'i' | 'm' | 's' => inline.push(flag),
                _ => return Err(format!("unsupported flag `{flag}` in format pattern `{pattern}`")),
            }
        }

        let source =
            if inline.is_empty() { source.to_string() } else { format!("(?{inline}){source}") };
        let regex = Regex::new(&source)
            .map_err(|e| format!("invalid format pattern `{pattern}`: {e}"))?;
        Ok(Self { regex, replacement: replacement.to_string(), global })
    }

    /// Applies the transformation to `input`.
    #[must_use]
    pub fn apply(&self, input: &str) -> String {
        if self.global {
            self.regex.replace_all(input, self.replacement.as_str()).into_owned()
        } else {
            self.regex.replace(input, self.replacement.as_str()).into_owned()
        }
    }
}

/// Source of the package name prefix used when deriving module names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleConfig {
    /// An inline JSON object supplied on the command line.
    Inline {
        /// The `name` field of the inline object, if any.
        name: Option<String>,
    },
    /// A package descriptor file read through the filesystem port.
    File(PathBuf),
}

/// Immutable configuration resolved before processing begins.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Input files or directories, in command-line order.
    pub args: Vec<PathBuf>,
    /// Variable name that receives the generated configuration.
    pub config: String,
    /// File whose content is prepended to the generated configuration.
    pub base: Option<PathBuf>,
    /// Destination of the generated configuration; stdout when absent.
    pub output: Option<PathBuf>,
    /// Glob applied while walking directories.
    pub file_pattern: String,
    /// Root folder stripped from file paths when deriving module names,
    /// slash-normalized.
    pub module_root: String,
    /// Package name source, if configured.
    pub module_config: Option<ModuleConfig>,
    /// Extension stripped instead of the file's own one.
    pub extension: Option<String>,
    /// Keep file extensions in derived module names.
    pub keep_extension: bool,
    /// Optional regex transformation for derived names.
    pub format: Option<NameFormat>,
    /// Lower-case derived module names.
    pub lower_case: bool,
    /// Omit path metadata from the generated configuration.
    pub ignore_path: bool,
    /// Never write rewritten module files back to disk.
    pub skip_file_override: bool,
    /// Namespace object prefixed onto registration calls.
    pub namespace: Option<String>,
    /// External parser invocation, split into program and arguments.
    pub parser_command: Vec<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            config: "__CONFIG__".to_string(),
            base: None,
            output: None,
            file_pattern: "**/*.js".to_string(),
            module_root: ".".to_string(),
            module_config: None,
            extension: None,
            keep_extension: false,
            format: None,
            lower_case: false,
            ignore_path: false,
            skip_file_override: false,
            namespace: None,
            parser_command: vec!["esparse".to_string(), "--range".to_string()],
        }
    }
}

/// Resolves parsed CLI arguments into [`GenerationOptions`].
///
/// # Errors
///
/// Returns an error for an invalid `--format` pair, an unparseable inline
/// `--module-config` object, or an empty `--parser` command.
pub fn resolve(cli: Cli) -> Result<GenerationOptions, String> {
    let module_root = cli.module_root.to_string_lossy().replace('\\', "/");

    let format = match &cli.format {
        Some(pair) if pair.len() == 2 => Some(NameFormat::parse(&pair[0], &pair[1])?),
        Some(_) => {
            return Err("--format takes exactly one PATTERN REPLACEMENT pair".to_string());
        }
        None => None,
    };

    let module_config = match &cli.module_config {
        Some(raw) if raw.trim_start().starts_with('{') => {
            let value: serde_json::Value = serde_json::from_str(raw)
                .map_err(|e| format!("invalid inline module config: {e}"))?;
            let name = value.get("name").and_then(serde_json::Value::as_str).map(String::from);
            Some(ModuleConfig::Inline { name })
        }
        Some(raw) => {
            let path = Path::new(raw);
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                Path::new(&module_root).join(path)
            };
            Some(ModuleConfig::File(path))
        }
        None => None,
    };

    let parser_command: Vec<String> = cli.parser.split_whitespace().map(String::from).collect();
    if parser_command.is_empty() {
        return Err("--parser command must not be empty".to_string());
    }

    Ok(GenerationOptions {
        args: cli.paths,
        config: cli.config,
        base: cli.base,
        output: cli.output,
        file_pattern: cli.file_pattern,
        module_root,
        module_config,
        extension: cli.extension,
        keep_extension: cli.keep_extension,
        format,
        lower_case: cli.lower_case,
        ignore_path: cli.ignore_path,
        skip_file_override: cli.skip_file_override,
        namespace: cli.namespace,
        parser_command,
    })
}
