//! Go build environment used to locate package sources.

use std::env;
use std::path::{Path, PathBuf};

use crate::constraint;

/// The Go toolchain layout the live resolver searches.
///
/// Passed explicitly to the resolver so that runs with different
/// environments can coexist in one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Root of the Go distribution; standard library sources live in `goroot/src`.
    pub goroot: PathBuf,
    /// Workspace roots; package sources live in `<entry>/src`.
    pub gopath: Vec<PathBuf>,
    /// Target operating system for filename build constraints.
    pub goos: String,
    /// Target architecture for filename build constraints.
    pub goarch: String,
    /// Whether the `cgo` build tag is set.
    pub cgo_enabled: bool,
    /// Minor version of the targeted Go release; `go1.1` through
    /// `go1.<go_minor>` are satisfied.
    pub go_minor: u32,
}

/// Release assumed when `GOROOT/VERSION` cannot be read.
pub const DEFAULT_GO_MINOR: u32 = 23;

/// Operating systems that satisfy the `unix` build tag.
pub const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

/// Operating systems recognised in `_GOOS` file name suffixes.
pub const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js",
    "linux", "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

/// Architectures recognised in `_GOARCH` file name suffixes.
pub const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "arm", "arm64", "loong64", "mips", "mips64", "mips64le", "mipsle",
    "ppc64", "ppc64le", "riscv64", "s390x", "sparc64", "wasm",
];

impl Environment {
    /// Reads `GOROOT`, `GOPATH`, `GOOS`, `GOARCH` and `CGO_ENABLED`, falling
    /// back to Go's defaults.
    ///
    /// cgo defaults to on only when building for the host. The release
    /// comes from the first line of `GOROOT/VERSION` (e.g. `go1.22.3`).
    #[must_use]
    pub fn from_env() -> Self {
        let goroot = env::var_os("GOROOT")
            .filter(|v| !v.is_empty())
            .map_or_else(|| PathBuf::from("/usr/local/go"), PathBuf::from);

        let gopath: Vec<PathBuf> = env::var_os("GOPATH")
            .filter(|v| !v.is_empty())
            .map(|v| env::split_paths(&v).collect())
            .unwrap_or_default();
        let gopath = if gopath.is_empty() { default_gopath() } else { gopath };

        let goos = env::var("GOOS").unwrap_or_else(|_| host_os().to_string());
        let goarch = env::var("GOARCH").unwrap_or_else(|_| host_arch().to_string());

        let native = goos == host_os() && goarch == host_arch();
        let cgo_enabled = match env::var("CGO_ENABLED").as_deref() {
            Ok("1") => true,
            Ok("0") => false,
            _ => native,
        };
        let go_minor = release_minor(&goroot).unwrap_or(DEFAULT_GO_MINOR);

        Self { goroot, gopath, goos, goarch, cgo_enabled, go_minor }
    }

    /// Directories searched for package sources, in priority order.
    #[must_use]
    pub fn source_roots(&self) -> Vec<PathBuf> {
        std::iter::once(self.goroot.join("src"))
            .chain(self.gopath.iter().map(|p| p.join("src")))
            .collect()
    }

    /// Reports whether a file name's `_GOOS` / `_GOARCH` suffixes admit it.
    ///
    /// Mirrors the Go rule: `name_GOOS_GOARCH.go`, `name_GOOS.go` and
    /// `name_GOARCH.go` are only built for the matching target.
    #[must_use]
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let stem = file_name.strip_suffix(".go").unwrap_or(file_name);
        let stem = stem.strip_suffix("_test").unwrap_or(stem);
        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() < 2 {
            return true;
        }
        let last = parts[parts.len() - 1];
        let second_last = if parts.len() >= 3 { Some(parts[parts.len() - 2]) } else { None };

        if let Some(os) = second_last {
            if KNOWN_OS.contains(&os) && KNOWN_ARCH.contains(&last) {
                return self.os_matches(os) && last == self.goarch;
            }
        }
        if KNOWN_OS.contains(&last) {
            return self.os_matches(last);
        }
        if KNOWN_ARCH.contains(&last) {
            return last == self.goarch;
        }
        true
    }

    /// Reports whether a build tag is satisfied by this environment.
    #[must_use]
    pub fn satisfies_tag(&self, tag: &str) -> bool {
        if self.os_matches(tag) || tag == self.goarch {
            return true;
        }
        match tag {
            "unix" => UNIX_OS.contains(&self.goos.as_str()),
            "cgo" => self.cgo_enabled,
            "gc" => true,
            _ => tag
                .strip_prefix("go1.")
                .and_then(|minor| minor.parse::<u32>().ok())
                .is_some_and(|minor| minor >= 1 && minor <= self.go_minor),
        }
    }

    /// Evaluates the build constraint in `source`'s header. Files without
    /// one always match.
    ///
    /// # Errors
    ///
    /// Returns an error if the constraint is malformed.
    pub fn matches_source(&self, source: &str) -> Result<bool, constraint::ConstraintError> {
        Ok(constraint::parse_header(source)?
            .map_or(true, |expr| expr.eval(&|tag| self.satisfies_tag(tag))))
    }

    fn os_matches(&self, os: &str) -> bool {
        os == self.goos
            || (os == "linux" && self.goos == "android")
            || (os == "darwin" && self.goos == "ios")
            || (os == "solaris" && self.goos == "illumos")
    }
}

fn release_minor(goroot: &Path) -> Option<u32> {
    let version = std::fs::read_to_string(goroot.join("VERSION")).ok()?;
    let minor = version.lines().next()?.trim().strip_prefix("go1.")?;
    minor.split(|c: char| !c.is_ascii_digit()).next()?.parse().ok()
}

fn default_gopath() -> Vec<PathBuf> {
    env::var_os("HOME").map(|home| vec![PathBuf::from(home).join("go")]).unwrap_or_default()
}

fn host_os() -> &'static str {
    match env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

fn host_arch() -> &'static str {
    match env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}
