//! Strategy traits deciding which packages are extracted and where they go.

use crate::import_path::ImportPath;

/// Decides whether a discovered dependency is extracted and scanned further.
pub trait InclusionPolicy: Send + Sync {
    /// Returns `true` if `path` should join the closure.
    fn include(&self, path: &ImportPath) -> bool;
}

/// Produces the relocated import path for an extracted package.
///
/// Implementations must be deterministic and must not map two distinct
/// inputs to the same output.
pub trait Renamer: Send + Sync {
    /// Returns the relocated path for `path`.
    fn rename(&self, path: &ImportPath) -> ImportPath;
}

impl<F> InclusionPolicy for F
where
    F: Fn(&ImportPath) -> bool + Send + Sync,
{
    fn include(&self, path: &ImportPath) -> bool {
        self(path)
    }
}

impl<F> Renamer for F
where
    F: Fn(&ImportPath) -> ImportPath + Send + Sync,
{
    fn rename(&self, path: &ImportPath) -> ImportPath {
        self(path)
    }
}

/// Prefix-based inclusion policy.
///
/// Exclusions win over inclusions. An empty `include` list admits every path
/// that is not excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathFilter {
    /// Prefixes that are eligible for extraction.
    pub include: Vec<String>,
    /// Prefixes that are never extracted.
    pub exclude: Vec<String>,
    /// Leave standard library packages out of the closure.
    pub skip_stdlib: bool,
}

impl PathFilter {
    /// A filter that admits everything outside the standard library.
    #[must_use]
    pub fn non_stdlib() -> Self {
        Self { skip_stdlib: true, ..Self::default() }
    }
}

impl InclusionPolicy for PathFilter {
    fn include(&self, path: &ImportPath) -> bool {
        if self.skip_stdlib && path.is_stdlib() {
            return false;
        }
        if self.exclude.iter().any(|prefix| path.has_prefix(prefix)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|prefix| path.has_prefix(prefix))
    }
}

/// Relocates every package beneath a fixed prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixRenamer {
    prefix: String,
}

impl PrefixRenamer {
    /// Creates a renamer that places packages under `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix: String = prefix.into();
        Self { prefix: prefix.trim_end_matches('/').to_string() }
    }
}

impl Renamer for PrefixRenamer {
    fn rename(&self, path: &ImportPath) -> ImportPath {
        if self.prefix.is_empty() {
            return path.clone();
        }
        ImportPath::new(format!("{}/{}", self.prefix, path.as_str()))
    }
}
