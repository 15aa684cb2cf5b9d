//! `pkgextract scan` command.

use tracing::info;

use crate::cli::ClosureArgs;
use crate::closure::{scan, IdentifierMap};
use crate::config::ExtractConfig;
use crate::context::ServiceContext;
use crate::import_path::ImportPath;

/// Computes the identifier map rooted at `package` without writing any files.
///
/// # Errors
///
/// Returns an error string if no prefix is configured or the scan fails.
pub fn closure_map(
    ctx: &ServiceContext,
    package: &str,
    config: &ExtractConfig,
) -> Result<IdentifierMap, String> {
    let renamer = config.renamer()?;
    let root = ImportPath::new(package);
    let map = scan(ctx.resolver.as_ref(), &root, &config.filter(), &renamer)
        .map_err(|e| e.to_string())?;
    info!(root = %root, packages = map.len(), "closure computed");
    Ok(map)
}

/// Execute the `scan` command: print the identifier map as YAML.
///
/// # Errors
///
/// Returns an error string if the scan fails or the map cannot be serialized.
pub fn run_with_context(ctx: &ServiceContext, args: &ClosureArgs) -> Result<(), String> {
    let config = args.resolve_config()?;
    let map = closure_map(ctx, &args.package, &config)?;
    let yaml =
        serde_yaml::to_string(&map).map_err(|e| format!("Failed to serialize identifier map: {e}"))?;
    print!("{yaml}");
    Ok(())
}
