//! Replaying adapter for the `Storage` port.

use std::path::Path;
use std::sync::Mutex;

use super::extract_result;
use crate::cassette::format::Interaction;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::storage::Storage;

/// Replays recorded storage operations from a cassette.
///
/// Each call is matched to a recorded interaction by method and path, so the
/// order of calls may differ from the recording (as it does when packages
/// are extracted concurrently). Writes are not performed; the recorded
/// outcome is returned instead, and the contents must match the recording.
pub struct ReplayingStorage {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingStorage {
    /// Creates a new replaying storage from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn take(
        &self,
        method: &str,
        path: &Path,
    ) -> Result<Interaction, Box<dyn std::error::Error + Send + Sync>> {
        let path = path.display().to_string();
        let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
        replayer
            .take_for_path("storage", method, &path)
            .ok_or_else(|| format!("cassette has no recorded storage::{method} for {path}").into())
    }
}

impl Storage for ReplayingStorage {
    fn create_dir_all(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let interaction = self.take("create_dir_all", path)?;
        extract_result(&interaction.output, "storage::create_dir_all")
    }

    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let interaction = self.take("read_to_string", path)?;
        extract_result(&interaction.output, "storage::read_to_string")
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let interaction = self.take("write", path)?;
        if interaction.input_contents().is_some_and(|recorded| recorded != contents) {
            return Err(format!("contents written to {} differ from the recording", path.display())
                .into());
        }
        extract_result(&interaction.output, "storage::write")
    }
}
