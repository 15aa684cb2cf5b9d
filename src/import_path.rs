//! Go import paths, the identifiers every other module is keyed on.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A `/`-separated Go import path such as `github.com/org/lib/sub`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportPath(String);

impl ImportPath {
    /// Wraps a raw import path string.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates the `/`-separated elements, skipping empty ones.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Returns `true` if this path equals `prefix` or lies beneath it.
    ///
    /// Matching happens at element boundaries, so `golang.org/x/net` is not
    /// a prefix of `golang.org/x/network`.
    #[must_use]
    pub fn has_prefix(&self, prefix: &str) -> bool {
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return true;
        }
        match self.0.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Returns `true` for standard library paths, whose first element has no dot.
    #[must_use]
    pub fn is_stdlib(&self) -> bool {
        self.segments().next().is_some_and(|first| !first.contains('.'))
    }

    /// Joins the path's elements onto `base` as directories.
    #[must_use]
    pub fn to_dir(&self, base: &Path) -> PathBuf {
        self.segments().fold(base.to_path_buf(), |dir, segment| dir.join(segment))
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImportPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for ImportPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_matches_on_element_boundaries() {
        let path = ImportPath::from("golang.org/x/net/context");
        assert!(path.has_prefix("golang.org/x/net"));
        assert!(path.has_prefix("golang.org/x/net/"));
        assert!(path.has_prefix("golang.org/x/net/context"));
        assert!(!path.has_prefix("golang.org/x/ne"));
        assert!(!ImportPath::from("golang.org/x/network").has_prefix("golang.org/x/net"));
    }

    #[test]
    fn stdlib_detection_uses_first_element() {
        assert!(ImportPath::from("fmt").is_stdlib());
        assert!(ImportPath::from("net/http").is_stdlib());
        assert!(!ImportPath::from("github.com/pkg/errors").is_stdlib());
        assert!(!ImportPath::from("").is_stdlib());
    }

    #[test]
    fn to_dir_joins_each_element() {
        let dir = ImportPath::from("out/github.com/a/b").to_dir(Path::new("/dst"));
        assert_eq!(dir, PathBuf::from("/dst/out/github.com/a/b"));
    }
}
