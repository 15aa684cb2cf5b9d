//! On-disk shape of a recorded extraction run.
//!
//! A cassette holds the calls an extraction made on its two ports, in the
//! order they happened:
//!
//! - `resolver` / `resolve`: input `{path: <import path>}`, output the
//!   package's `ModuleMetadata` (directory, buildable file names, imports).
//! - `storage` / `create_dir_all` and `read_to_string`: input `{path: <file
//!   system path>}`.
//! - `storage` / `write`: input `{path, contents}`, the rewritten file.
//!
//! Outputs use `{"ok": value}` for success and `{"err": message}` for
//! failure, so a replayed run fails exactly where the recorded one did.
//! Every input carries a `path`, which is what replay matches on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One call made on a port during a recorded run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position in the recording, assigned by the recorder.
    pub seq: u64,
    /// `resolver` or `storage`.
    pub port: String,
    /// Port method, e.g. `resolve` or `read_to_string`.
    pub method: String,
    /// Call arguments; always an object with a `path` key.
    pub input: serde_json::Value,
    /// `{"ok": ...}` or `{"err": "..."}`.
    pub output: serde_json::Value,
}

impl Interaction {
    /// Import path or file path the call was made for.
    #[must_use]
    pub fn input_path(&self) -> Option<&str> {
        self.input.get("path").and_then(serde_json::Value::as_str)
    }

    /// File contents passed to `storage::write`.
    #[must_use]
    pub fn input_contents(&self) -> Option<&str> {
        self.input.get("contents").and_then(serde_json::Value::as_str)
    }
}

/// A recorded run: one file per port when written by a recording session,
/// or both ports interleaved in one hand-assembled file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Session name, e.g. `extract-session`.
    pub name: String,
    /// When the run was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Git commit of the working directory, or `unknown`.
    pub commit: String,
    /// Calls in recording order.
    pub interactions: Vec<Interaction>,
}
