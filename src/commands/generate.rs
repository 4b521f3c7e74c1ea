//! The generate command: scan inputs, aggregate the manifest, emit the
//! configuration fragment.

use std::sync::Arc;

use crate::context::ServiceContext;
use crate::manifest::{self, Manifest};
use crate::naming::MetadataCache;
use crate::options::GenerationOptions;
use crate::pipeline;

/// Executes a full generation run with live adapters.
///
/// # Errors
///
/// Returns an error string when any stage of the run fails; there is no
/// partial-success mode.
pub fn run(options: GenerationOptions) -> Result<(), String> {
    let ctx = ServiceContext::live(&options.parser_command);
    run_with_context(ctx, options)
}

/// Executes a full generation run against the given context.
///
/// # Errors
///
/// Returns an error string on base/input/processing/output failure.
pub fn run_with_context(ctx: ServiceContext, options: GenerationOptions) -> Result<(), String> {
    let ctx = Arc::new(ctx);
    let options = Arc::new(options);

    // The base content is read up front so a bad path fails before any
    // file is touched.
    let base = match &options.base {
        Some(path) => Some(
            ctx.fs
                .read_to_string(path)
                .map_err(|e| format!("failed to read base file {}: {e}", path.display()))?,
        ),
        None => None,
    };

    let files = pipeline::expand_inputs(&ctx, &options)?;
    let file_count = files.len();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|e| format!("failed to start runtime: {e}"))?;
    let cache = Arc::new(MetadataCache::new());
    let reports = runtime.block_on(pipeline::run_files(
        Arc::clone(&ctx),
        Arc::clone(&options),
        cache,
        files,
    ))?;

    let mut manifest = Manifest::new();
    let mut rewritten = 0usize;
    for report in reports {
        rewritten += usize::from(report.rewritten);
        for module in report.modules {
            manifest.insert(module, options.ignore_path);
        }
    }

    let content = manifest::render_config(&manifest, &options.config, base.as_deref());
    match &options.output {
        Some(path) => {
            ctx.fs
                .write(path, &content)
                .map_err(|e| format!("failed to write config to {}: {e}", path.display()))?;
            println!(
                "Config generated: {} modules from {file_count} files ({rewritten} rewritten)",
                manifest.len(),
            );
            println!("Written to {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}
