//! Breadth-first discovery of the packages to extract.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, info};

use super::identifier_map::IdentifierMap;
use super::strategy::{InclusionPolicy, Renamer};
use crate::error::ExtractError;
use crate::import_path::ImportPath;
use crate::ports::ModuleResolver;

/// Computes the closure of `root` under `policy`.
///
/// The root is always included, whatever `policy` says about it. Every
/// dependency is examined once: a path rejected by `policy` is remembered as
/// visited and never reconsidered through another importer. Each distinct
/// path is resolved at most once, so cyclic import graphs terminate.
///
/// # Errors
///
/// Returns [`ExtractError::Resolution`] for the first package the resolver
/// cannot resolve. No partial map is returned.
pub fn scan(
    resolver: &dyn ModuleResolver,
    root: &ImportPath,
    policy: &dyn InclusionPolicy,
    renamer: &dyn Renamer,
) -> Result<IdentifierMap, ExtractError> {
    let mut map = IdentifierMap::new();
    map.insert(root.clone(), renamer.rename(root));

    let mut frontier: VecDeque<ImportPath> = VecDeque::from([root.clone()]);
    let mut visited: HashSet<ImportPath> = HashSet::from([root.clone()]);

    while let Some(path) = frontier.pop_front() {
        let metadata = resolver.resolve(&path).map_err(|e| ExtractError::Resolution {
            path: path.clone(),
            message: e.to_string(),
        })?;
        debug!(package = %path, imports = metadata.imports.len(), "scanned package");

        for dep in metadata.imports {
            if !visited.insert(dep.clone()) {
                continue;
            }
            if policy.include(&dep) {
                let relocated = renamer.rename(&dep);
                debug!(package = %dep, relocated = %relocated, "including dependency");
                map.insert(dep.clone(), relocated);
                frontier.push_back(dep);
            } else {
                debug!(package = %dep, importer = %path, "leaving dependency in place");
            }
        }
    }

    info!(root = %root, packages = map.len(), visited = visited.len(), "scan complete");
    Ok(map)
}
