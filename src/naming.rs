//! Canonical module-name derivation.
//!
//! Names are derived purely from the file path and the resolved options,
//! optionally prefixed with the `name` field of a package descriptor
//! (`bower.json`/`package.json` style). The descriptor read is memoized per
//! path so concurrent file tasks share a single lookup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Deserialize;

use crate::options::{GenerationOptions, ModuleConfig};
use crate::ports::filesystem::FileSystem;

/// Derives the canonical module name for `file`.
///
/// Deterministic and side-effect-free: the same `(file, options,
/// package_name)` triple always yields the same string. The steps are
/// extension resolution, module-root prefix stripping, `format`
/// transformation of the base name, joining with the package name and
/// directory, and optional lower-casing.
#[must_use]
pub fn derive_name(
    file: &Path,
    options: &GenerationOptions,
    package_name: Option<&str>,
) -> String {
    let file_str = file.to_string_lossy().replace('\\', "/");

    let mut relative = file_str.as_str();
    if !options.module_root.is_empty() && relative.starts_with(options.module_root.as_str()) {
        relative = &relative[options.module_root.len()..];
    }
    let relative = relative.trim_start_matches('/');

    let extension = if options.keep_extension {
        String::new()
    } else {
        options.extension.clone().unwrap_or_else(|| extension_of(relative).to_string())
    };

    let base = basename(relative);
    let stem = base.strip_suffix(extension.as_str()).unwrap_or(base);
    let stem = match &options.format {
        Some(format) => format.apply(stem),
        None => stem.to_string(),
    };

    let directory = dirname(relative);
    let mut segments: Vec<&str> = Vec::new();
    if let Some(name) = package_name {
        if !name.is_empty() {
            segments.push(name);
        }
    }
    if !directory.is_empty() && directory != "." {
        segments.push(directory);
    }
    segments.push(&stem);
    let name = segments.join("/");

    if options.lower_case {
        name.to_lowercase()
    } else {
        name
    }
}

/// The fields read from a package descriptor file.
#[derive(Debug, Deserialize)]
struct PackageDescriptor {
    #[serde(default)]
    name: Option<String>,
}

/// Memoized package-name lookups, shared by all file tasks of one run.
///
/// Read-only after first population per path; concurrent readers are safe.
#[derive(Debug, Default)]
pub struct MetadataCache {
    names: Mutex<HashMap<PathBuf, Option<String>>>,
}

impl MetadataCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the package name for the configured module config.
    ///
    /// A missing descriptor file is not an error; the name segment is
    /// simply absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the descriptor exists but cannot be read or
    /// parsed.
    pub fn package_name(
        &self,
        fs: &dyn FileSystem,
        module_config: Option<&ModuleConfig>,
    ) -> Result<Option<String>, String> {
        let Some(module_config) = module_config else {
            return Ok(None);
        };
        let path = match module_config {
            ModuleConfig::Inline { name } => return Ok(name.clone()),
            ModuleConfig::File(path) => path,
        };

        {
            let names = self
                .names
                .lock()
                .map_err(|_| "package metadata cache is poisoned".to_string())?;
            if let Some(cached) = names.get(path) {
                return Ok(cached.clone());
            }
        }

        let name = if fs.exists(path) {
            let text = fs
                .read_to_string(path)
                .map_err(|e| format!("failed to read module config {}: {e}", path.display()))?;
            let descriptor: PackageDescriptor = serde_json::from_str(&text)
                .map_err(|e| format!("failed to parse module config {}: {e}", path.display()))?;
            descriptor.name
        } else {
            None
        };

        let mut names = self
            .names
            .lock()
            .map_err(|_| "package metadata cache is poisoned".to_string())?;
        names.insert(path.clone(), name.clone());
        Ok(name)
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn dirname(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => "",
    }
}

/// Returns the last extension of the path's base name, dot included, or an
/// empty string for dotfiles and extensionless names.
fn extension_of(path: &str) -> &str {
    let base = basename(path);
    match base.rfind('.') {
        Some(index) if index > 0 => &base[index..],
        _ => "",
    }
}
