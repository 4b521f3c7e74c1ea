//! Per-file analysis pipeline and run-level fan-out/fan-in.
//!
//! Each input file is read, parsed, matched, extracted, and optionally
//! rewritten by a single task that owns the file for its lifetime, so no
//! two tasks ever touch the same file. Results are awaited in dispatch
//! order, which keeps the manifest reproducible: it reflects input
//! traversal order, never scheduler completion order. Any task failure
//! fails the whole run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::analyze::condition::extract_condition;
use crate::analyze::matcher::call_sites;
use crate::analyze::values::{extract, ExtractedValue};
use crate::ast::Program;
use crate::context::ServiceContext;
use crate::manifest::ModuleDescriptor;
use crate::naming::{derive_name, MetadataCache};
use crate::options::GenerationOptions;
use crate::rewrite;

/// Result of processing one input file.
#[derive(Debug)]
pub struct FileReport {
    /// The processed file.
    pub file: PathBuf,
    /// Discovered modules, in match order.
    pub modules: Vec<ModuleDescriptor>,
    /// Whether the rewritten source was persisted.
    pub rewritten: bool,
}

/// Expands the input arguments into the ordered list of files to process.
///
/// Explicit file arguments are taken as-is; directories are walked with the
/// configured glob. Order follows the command line, then the walker's
/// stable traversal order.
///
/// # Errors
///
/// Returns an error when an input path does not exist or a directory walk
/// fails.
pub fn expand_inputs(
    ctx: &ServiceContext,
    options: &GenerationOptions,
) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();
    for arg in &options.args {
        if ctx.fs.is_dir(arg) {
            let walked = ctx
                .walker
                .walk(arg, &options.file_pattern)
                .map_err(|e| format!("failed to scan {}: {e}", arg.display()))?;
            files.extend(walked);
        } else if ctx.fs.exists(arg) {
            files.push(arg.clone());
        } else {
            return Err(format!("input path {} does not exist", arg.display()));
        }
    }
    Ok(files)
}

/// Analyzes one parsed source: matches registration calls, derives names,
/// extracts dependencies and condition metadata, and plans rewrites.
///
/// Returns the discovered modules in match order, plus the rewritten source
/// text when at least one edit was planned. Name synthesis always happens
/// for 2-argument calls because the manifest needs the canonical name;
/// persisting the rewrite is the caller's decision.
///
/// # Errors
///
/// Returns an error when planned edits cannot be applied, which indicates
/// spans that do not match the source text.
pub fn process_source(
    file: &Path,
    source: &str,
    program: &Program,
    options: &GenerationOptions,
    package_name: Option<&str>,
) -> Result<(Vec<ModuleDescriptor>, Option<String>), String> {
    let file_name =
        file.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();

    let mut modules = Vec::new();
    let mut edits = Vec::new();

    for site in call_sites(program, options.namespace.as_deref()) {
        let name = match site.id() {
            Some(id) => id.to_string(),
            None => {
                let synthesized = derive_name(file, options, package_name);
                if let Some(edit) = rewrite::id_insertion(&site, &synthesized) {
                    edits.push(edit);
                }
                synthesized
            }
        };
        if let Some(edit) = rewrite::namespace_edit(&site, options.namespace.as_deref()) {
            edits.push(edit);
        }

        let dependencies = extract(site.dependencies(), source)
            .unwrap_or_else(|| ExtractedValue::Array(Vec::new()));

        let mut descriptor = ModuleDescriptor {
            file: file_name.clone(),
            name,
            dependencies,
            condition: None,
            group: None,
            path: None,
            full_path: None,
        };
        for (key, value) in extract_condition(site.args, source) {
            match key.as_str() {
                "condition" => descriptor.condition = Some(value),
                "group" => descriptor.group = Some(value),
                "path" => descriptor.path = value.as_str().map(str::to_string),
                "fullPath" => descriptor.full_path = value.as_str().map(str::to_string),
                _ => {}
            }
        }
        modules.push(descriptor);
    }

    let rewritten = if edits.is_empty() {
        None
    } else {
        Some(
            rewrite::apply(source, &edits)
                .map_err(|e| format!("failed to rewrite {}: {e}", file.display()))?,
        )
    };
    Ok((modules, rewritten))
}

/// Processes one file end to end: read, parse, analyze, and write the
/// rewritten source back at most once.
///
/// # Errors
///
/// Returns an error on read, parse, metadata, rewrite, or write failure;
/// all of these abort the whole run.
pub fn process_file(
    ctx: &ServiceContext,
    options: &GenerationOptions,
    cache: &MetadataCache,
    file: &Path,
) -> Result<FileReport, String> {
    let source = ctx
        .fs
        .read_to_string(file)
        .map_err(|e| format!("failed to read {}: {e}", file.display()))?;
    let program = ctx
        .parser
        .parse(file, &source)
        .map_err(|e| format!("failed to parse {}: {e}", file.display()))?;
    let package_name = cache.package_name(ctx.fs.as_ref(), options.module_config.as_ref())?;

    let (modules, rewritten_source) =
        process_source(file, &source, &program, options, package_name.as_deref())?;

    let mut rewritten = false;
    if let Some(new_source) = rewritten_source {
        if !options.skip_file_override {
            ctx.fs
                .write(file, &new_source)
                .map_err(|e| format!("failed to write {}: {e}", file.display()))?;
            rewritten = true;
        }
    }

    Ok(FileReport { file: file.to_path_buf(), modules, rewritten })
}

/// Processes every file as its own blocking task and collects the reports
/// in dispatch order (the fan-in barrier).
///
/// # Errors
///
/// Returns the first per-file error in dispatch order; the run has no
/// partial-success mode.
pub async fn run_files(
    ctx: Arc<ServiceContext>,
    options: Arc<GenerationOptions>,
    cache: Arc<MetadataCache>,
    files: Vec<PathBuf>,
) -> Result<Vec<FileReport>, String> {
    let mut handles = Vec::with_capacity(files.len());
    for file in files {
        let ctx = Arc::clone(&ctx);
        let options = Arc::clone(&options);
        let cache = Arc::clone(&cache);
        handles.push(tokio::task::spawn_blocking(move || {
            process_file(&ctx, &options, &cache, &file)
        }));
    }

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        reports.push(handle.await.map_err(|e| format!("file task failed: {e}"))??);
    }
    Ok(reports)
}
