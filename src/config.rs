//! Extraction settings loaded from YAML and overridden from the command line.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::closure::{PathFilter, PrefixRenamer};

/// Jobs used when neither the file nor the command line sets `jobs`.
pub const DEFAULT_JOBS: usize = 1;

/// Settings for one extraction run.
///
/// Every field is optional in the YAML file:
///
/// ```yaml
/// prefix: example.com/vendored
/// output: ./out
/// include: [github.com/acme]
/// exclude: [github.com/acme/internal/testdata]
/// with_stdlib: false
/// jobs: 4
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Import path prefix the closure is relocated under.
    pub prefix: Option<String>,
    /// Root directory the relocated tree is written to.
    pub output: Option<PathBuf>,
    /// Only dependencies under these prefixes are extracted.
    pub include: Vec<String>,
    /// Dependencies under these prefixes are never extracted.
    pub exclude: Vec<String>,
    /// Extract standard library packages as well.
    pub with_stdlib: bool,
    /// Packages extracted in parallel.
    pub jobs: Option<usize>,
}

impl ExtractConfig {
    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Applies `overrides` on top of `self`.
    ///
    /// Scalars set in `overrides` replace file values; prefix lists are
    /// appended; `with_stdlib` is enabled if either side enables it.
    #[must_use]
    pub fn merge(mut self, overrides: Self) -> Self {
        if overrides.prefix.is_some() {
            self.prefix = overrides.prefix;
        }
        if overrides.output.is_some() {
            self.output = overrides.output;
        }
        if overrides.jobs.is_some() {
            self.jobs = overrides.jobs;
        }
        self.include.extend(overrides.include);
        self.exclude.extend(overrides.exclude);
        self.with_stdlib |= overrides.with_stdlib;
        self
    }

    /// Inclusion policy described by these settings.
    #[must_use]
    pub fn filter(&self) -> PathFilter {
        PathFilter {
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            skip_stdlib: !self.with_stdlib,
        }
    }

    /// Renamer for the configured prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if no non-empty prefix is configured.
    pub fn renamer(&self) -> Result<PrefixRenamer, String> {
        match self.prefix.as_deref().map(|p| p.trim_end_matches('/')) {
            Some(prefix) if !prefix.is_empty() => Ok(PrefixRenamer::new(prefix)),
            _ => Err("no import prefix configured: pass --prefix or set `prefix` in the config file"
                .to_string()),
        }
    }

    /// Output root, defaulting to the current directory.
    #[must_use]
    pub fn output_root(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Parallelism, at least one.
    #[must_use]
    pub fn jobs(&self) -> usize {
        self.jobs.unwrap_or(DEFAULT_JOBS).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closure::{InclusionPolicy, Renamer};
    use crate::import_path::ImportPath;

    #[test]
    fn load_reads_partial_yaml() {
        let dir = std::env::temp_dir().join("pkgextract_config_test_load");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("extract.yaml");
        std::fs::write(&path, "prefix: example.com/vendored\nexclude: [golang.org/x]\njobs: 3\n")
            .unwrap();

        let config = ExtractConfig::load(&path).unwrap();
        assert_eq!(config.prefix.as_deref(), Some("example.com/vendored"));
        assert_eq!(config.exclude, vec!["golang.org/x"]);
        assert!(config.include.is_empty());
        assert_eq!(config.jobs(), 3);
        assert_eq!(config.output_root(), PathBuf::from("."));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_rejects_unknown_fields() {
        let dir = std::env::temp_dir().join("pkgextract_config_test_unknown");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("extract.yaml");
        std::fs::write(&path, "prefx: typo\n").unwrap();

        let err = ExtractConfig::load(&path).unwrap_err();
        assert!(err.contains("Failed to parse config"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn command_line_overrides_file() {
        let file = ExtractConfig {
            prefix: Some("file.example/p".into()),
            output: Some("file-out".into()),
            exclude: vec!["a.example/x".into()],
            jobs: Some(2),
            ..ExtractConfig::default()
        };
        let cli = ExtractConfig {
            prefix: Some("cli.example/p".into()),
            exclude: vec!["b.example/y".into()],
            with_stdlib: true,
            ..ExtractConfig::default()
        };

        let merged = file.merge(cli);
        assert_eq!(merged.prefix.as_deref(), Some("cli.example/p"));
        assert_eq!(merged.output_root(), PathBuf::from("file-out"));
        assert_eq!(merged.exclude, vec!["a.example/x", "b.example/y"]);
        assert_eq!(merged.jobs(), 2);
        assert!(merged.with_stdlib);
    }

    #[test]
    fn filter_skips_stdlib_unless_requested() {
        let mut config = ExtractConfig::default();
        assert!(!config.filter().include(&ImportPath::from("fmt")));
        config.with_stdlib = true;
        assert!(config.filter().include(&ImportPath::from("fmt")));
    }

    #[test]
    fn missing_prefix_is_an_error() {
        assert!(ExtractConfig::default().renamer().is_err());
        let blank = ExtractConfig { prefix: Some("/".into()), ..ExtractConfig::default() };
        assert!(blank.renamer().is_err());

        let config = ExtractConfig { prefix: Some("v/".into()), ..ExtractConfig::default() };
        let renamed = config.renamer().unwrap().rename(&ImportPath::from("example.com/a"));
        assert_eq!(renamed.as_str(), "v/example.com/a");
    }

    #[test]
    fn zero_jobs_means_one() {
        let config = ExtractConfig { jobs: Some(0), ..ExtractConfig::default() };
        assert_eq!(config.jobs(), 1);
    }
}
