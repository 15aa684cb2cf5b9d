//! Materialises the closure under its relocated import paths.
//!
//! Every package in the identifier map is resolved again, its destination
//! directory is created under the output root, and each of its files is
//! rewritten against the frozen map and written there under the same name.
//! The map is only read, so packages can be processed in any order or in
//! parallel.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::closure::IdentifierMap;
use crate::context::ServiceContext;
use crate::error::ExtractError;
use crate::import_path::ImportPath;
use crate::rewrite::rewrite;

/// Counts of what an extraction wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Packages materialised.
    pub packages: usize,
    /// Files written across all packages.
    pub files: usize,
}

impl ExtractSummary {
    fn add(&mut self, files: usize) {
        self.packages += 1;
        self.files += files;
    }
}

/// Extracts every package in `map` into `output_root`, one after another.
///
/// # Errors
///
/// Stops at the first resolution, parse, rewrite or storage failure. Files
/// written before the failure are left in place.
pub fn extract_all(
    ctx: &ServiceContext,
    map: &IdentifierMap,
    output_root: &Path,
) -> Result<ExtractSummary, ExtractError> {
    let mut summary = ExtractSummary::default();
    for (original, relocated) in map {
        let files = extract_package(ctx, map, original, relocated, output_root)?;
        summary.add(files);
    }
    info!(packages = summary.packages, files = summary.files, "extraction complete");
    Ok(summary)
}

/// Extracts every package in `map` with up to `jobs` packages in flight.
///
/// Package work runs on tokio's blocking pool. Once a package fails no new
/// package is started; packages already running are allowed to finish and
/// the first failure is returned.
///
/// # Errors
///
/// Returns the first error reported by any package.
pub async fn extract_all_concurrent(
    ctx: Arc<ServiceContext>,
    map: Arc<IdentifierMap>,
    output_root: PathBuf,
    jobs: usize,
) -> Result<ExtractSummary, ExtractError> {
    let jobs = jobs.max(1);
    let output_root = Arc::new(output_root);
    let mut pending = map
        .iter()
        .map(|(original, relocated)| (original.clone(), relocated.clone()))
        .collect::<Vec<_>>()
        .into_iter();

    let mut in_flight = JoinSet::new();
    let mut summary = ExtractSummary::default();
    let mut first_error: Option<ExtractError> = None;

    loop {
        while first_error.is_none() && in_flight.len() < jobs {
            let Some((original, relocated)) = pending.next() else {
                break;
            };
            let ctx = Arc::clone(&ctx);
            let map = Arc::clone(&map);
            let output_root = Arc::clone(&output_root);
            in_flight.spawn_blocking(move || {
                extract_package(&ctx, &map, &original, &relocated, &output_root)
            });
        }

        let Some(joined) = in_flight.join_next().await else {
            break;
        };
        match joined {
            Ok(Ok(files)) => summary.add(files),
            Ok(Err(err)) => {
                if first_error.is_none() {
                    warn!(error = %err, "package failed, draining in-flight work");
                    first_error = Some(err);
                } else {
                    debug!(error = %err, "additional failure while draining");
                }
            }
            Err(join_err) if join_err.is_panic() => {
                std::panic::resume_unwind(join_err.into_panic());
            }
            Err(join_err) => debug!(error = %join_err, "extraction task cancelled"),
        }
    }

    if let Some(err) = first_error {
        return Err(err);
    }
    info!(packages = summary.packages, files = summary.files, jobs, "extraction complete");
    Ok(summary)
}

/// Materialises one package and returns the number of files written.
///
/// # Errors
///
/// Returns the first failure for this package.
pub fn extract_package(
    ctx: &ServiceContext,
    map: &IdentifierMap,
    original: &ImportPath,
    relocated: &ImportPath,
    output_root: &Path,
) -> Result<usize, ExtractError> {
    let metadata = ctx.resolver.resolve(original).map_err(|e| ExtractError::Resolution {
        path: original.clone(),
        message: e.to_string(),
    })?;

    let dest_dir = relocated.to_dir(output_root);
    ctx.storage
        .create_dir_all(&dest_dir)
        .map_err(|e| ExtractError::io(dest_dir.clone(), e.as_ref()))?;

    for file in &metadata.files {
        extract_file(ctx, map, &metadata.dir.join(file), &dest_dir.join(file))?;
    }

    info!(
        package = %original,
        relocated = %relocated,
        files = metadata.files.len(),
        "extracted package"
    );
    Ok(metadata.files.len())
}

fn extract_file(
    ctx: &ServiceContext,
    map: &IdentifierMap,
    src: &Path,
    dest: &Path,
) -> Result<(), ExtractError> {
    let source = ctx
        .storage
        .read_to_string(src)
        .map_err(|e| ExtractError::io(src.to_path_buf(), e.as_ref()))?;
    let rewritten =
        rewrite(&source, map).map_err(|e| ExtractError::from_rewrite(src.to_path_buf(), e))?;
    ctx.storage
        .write(dest, &rewritten)
        .map_err(|e| ExtractError::io(dest.to_path_buf(), e.as_ref()))?;
    debug!(src = %src.display(), dest = %dest.display(), "rewrote file");
    Ok(())
}
