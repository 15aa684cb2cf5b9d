//! `pkgextract extract` command.

use std::sync::Arc;

use tracing::info;

use super::scan::closure_map;
use crate::cli::ClosureArgs;
use crate::context::ServiceContext;
use crate::extract::{extract_all, extract_all_concurrent, ExtractSummary};

/// Execute the `extract` command: scan the closure and write the relocated tree.
///
/// With more than one job, packages are extracted on a current-thread tokio
/// runtime that farms file work out to the blocking pool.
///
/// # Errors
///
/// Returns an error string if configuration, scanning or extraction fails.
pub fn run_with_context(ctx: &Arc<ServiceContext>, args: &ClosureArgs) -> Result<(), String> {
    let config = args.resolve_config()?;
    let map = closure_map(ctx, &args.package, &config)?;
    let output_root = config.output_root();
    let jobs = config.jobs();
    info!(output = %output_root.display(), jobs, "extracting closure");

    let summary: ExtractSummary = if jobs > 1 {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(|e| format!("Failed to start runtime: {e}"))?;
        runtime
            .block_on(extract_all_concurrent(Arc::clone(ctx), Arc::new(map), output_root.clone(), jobs))
            .map_err(|e| e.to_string())?
    } else {
        extract_all(ctx, &map, &output_root).map_err(|e| e.to_string())?
    };

    println!(
        "extracted {} packages ({} files) into {}",
        summary.packages,
        summary.files,
        output_root.display()
    );
    Ok(())
}
