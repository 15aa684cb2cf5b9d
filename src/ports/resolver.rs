//! Module resolver port: import path to package metadata.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::import_path::ImportPath;

/// Resolved facts about one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleMetadata {
    /// Directory holding the package's source files.
    pub dir: PathBuf,
    /// Source file names inside `dir`, in build order.
    pub files: Vec<String>,
    /// Import paths declared by those files, sorted and de-duplicated.
    pub imports: Vec<ImportPath>,
}

/// Translates an import path into the package's physical metadata.
///
/// Implementations must return the same metadata every time a given path is
/// resolved within one run; the scanner and the extractor resolve
/// independently.
pub trait ModuleResolver: Send + Sync {
    /// Resolves `path` to its metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the package cannot be found or is ambiguous.
    fn resolve(
        &self,
        path: &ImportPath,
    ) -> Result<ModuleMetadata, Box<dyn std::error::Error + Send + Sync>>;
}
