//! Recording adapter for the `Storage` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::Storage;

/// Records storage interactions while delegating to an inner implementation.
pub struct RecordingStorage {
    inner: Box<dyn Storage>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingStorage {
    /// Creates a new recording storage wrapping the given implementation.
    pub fn new(inner: Box<dyn Storage>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct PathInput<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct WriteInput<'a> {
    path: &'a str,
    contents: &'a str,
}

impl Storage for RecordingStorage {
    fn create_dir_all(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.create_dir_all(path);
        let input = PathInput { path: &path.display().to_string() };
        record_result(&self.recorder, "storage", "create_dir_all", &input, &result);
        result
    }

    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.read_to_string(path);
        let input = PathInput { path: &path.display().to_string() };
        record_result(&self.recorder, "storage", "read_to_string", &input, &result);
        result
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.write(path, contents);
        let input = WriteInput { path: &path.display().to_string(), contents };
        record_result(&self.recorder, "storage", "write", &input, &result);
        result
    }
}
