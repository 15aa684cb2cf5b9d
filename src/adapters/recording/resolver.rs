//! Recording adapter for the `ModuleResolver` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::import_path::ImportPath;
use crate::ports::{ModuleMetadata, ModuleResolver};

/// Records resolutions while delegating to an inner resolver.
pub struct RecordingResolver {
    inner: Box<dyn ModuleResolver>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingResolver {
    /// Creates a new recording resolver wrapping the given implementation.
    pub fn new(inner: Box<dyn ModuleResolver>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct ResolveInput<'a> {
    path: &'a str,
}

impl ModuleResolver for RecordingResolver {
    fn resolve(
        &self,
        path: &ImportPath,
    ) -> Result<ModuleMetadata, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.resolve(path);
        let input = ResolveInput { path: path.as_str() };
        record_result(&self.recorder, "resolver", "resolve", &input, &result);
        result
    }
}
