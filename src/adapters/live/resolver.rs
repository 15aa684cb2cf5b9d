//! Live resolver that locates packages in GOROOT and GOPATH.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::environment::Environment;
use crate::import_path::ImportPath;
use crate::ports::resolver::{ModuleMetadata, ModuleResolver};
use crate::rewrite::SourceUnit;

/// Pseudo-package used by cgo; it has no sources to resolve.
const CGO_PSEUDO_PACKAGE: &str = "C";

/// Files declaring this package hold only documentation and are skipped.
const DOCUMENTATION_PACKAGE: &str = "documentation";

/// Resolves import paths the way the default Go build context does.
pub struct GopathResolver {
    env: Environment,
}

impl GopathResolver {
    /// Creates a resolver searching the roots of `env`.
    #[must_use]
    pub fn new(env: Environment) -> Self {
        Self { env }
    }

    /// Returns the environment this resolver searches.
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Lists buildable Go files in `dir`, sorted by name.
    fn buildable_files(&self, dir: &Path) -> std::io::Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if is_buildable(&name) && self.env.matches_file_name(&name) {
                files.push(name);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Reads the candidate files of `dir`, dropping those excluded by build
    /// constraints or cgo, and collects their imports.
    fn read_package(&self, dir: &Path, candidates: &[String]) -> Result<Package, String> {
        let mut package = Package::default();
        for file in candidates {
            let file_path = dir.join(file);
            let source = std::fs::read_to_string(&file_path)
                .map_err(|e| format!("failed to read {}: {e}", file_path.display()))?;
            let matches = self
                .env
                .matches_source(&source)
                .map_err(|e| format!("{}: {e}", file_path.display()))?;
            if !matches {
                trace!(file = %file_path.display(), "excluded by build constraint");
                continue;
            }

            let unit =
                SourceUnit::parse(&source).map_err(|e| format!("{}:{e}", file_path.display()))?;
            let mut imports = Vec::with_capacity(unit.imports().len());
            for spec in unit.imports() {
                let import = spec.path().map_err(|message| {
                    format!("{}:{}", file_path.display(), unit.literal_error(spec, message))
                })?;
                imports.push(import);
            }
            let uses_cgo = imports.iter().any(|i| i == CGO_PSEUDO_PACKAGE);
            if uses_cgo && !self.env.cgo_enabled {
                trace!(file = %file_path.display(), "cgo file excluded, cgo disabled");
                continue;
            }

            let name = unit.package_name();
            if name == DOCUMENTATION_PACKAGE {
                continue;
            }
            let (first, first_file) =
                package.name.get_or_insert_with(|| (name.to_string(), file.clone()));
            if first != name {
                return Err(format!(
                    "found packages {first} ({first_file}) and {name} ({file}) in {}",
                    dir.display()
                ));
            }

            package.files.push(file.clone());
            package.imports.extend(
                imports
                    .into_iter()
                    .filter(|i| i != CGO_PSEUDO_PACKAGE)
                    .map(ImportPath::from),
            );
        }
        Ok(package)
    }
}

/// Files of one directory that survive build constraints, and their imports.
#[derive(Default)]
struct Package {
    name: Option<(String, String)>,
    files: Vec<String>,
    imports: BTreeSet<ImportPath>,
}

fn is_buildable(name: &str) -> bool {
    Path::new(name).extension().is_some_and(|ext| ext == "go")
        && !name.ends_with("_test.go")
        && !name.starts_with('_')
        && !name.starts_with('.')
}

impl ModuleResolver for GopathResolver {
    fn resolve(
        &self,
        path: &ImportPath,
    ) -> Result<ModuleMetadata, Box<dyn std::error::Error + Send + Sync>> {
        let mut searched: Vec<PathBuf> = Vec::new();
        let mut excluded: Vec<PathBuf> = Vec::new();
        for root in self.env.source_roots() {
            let dir = path.to_dir(&root);
            searched.push(dir.clone());
            if !dir.is_dir() {
                continue;
            }
            let candidates = self
                .buildable_files(&dir)
                .map_err(|e| format!("failed to list {}: {e}", dir.display()))?;
            if candidates.is_empty() {
                trace!(dir = %dir.display(), "no buildable Go files");
                continue;
            }

            let package = self.read_package(&dir, &candidates)?;
            if package.files.is_empty() {
                trace!(dir = %dir.display(), "build constraints exclude all Go files");
                excluded.push(dir);
                continue;
            }
            return Ok(ModuleMetadata {
                dir,
                files: package.files,
                imports: package.imports.into_iter().collect(),
            });
        }

        if let Some(dir) = excluded.first() {
            return Err(format!(
                "build constraints exclude all Go files in {} (package \"{path}\")",
                dir.display()
            )
            .into());
        }
        let searched: Vec<String> = searched.iter().map(|d| d.display().to_string()).collect();
        Err(format!("cannot find package \"{path}\" in any of: {}", searched.join(", ")).into())
    }
}
