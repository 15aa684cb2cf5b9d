//! Service context bundling the port trait objects an extraction uses.

use std::path::Path;

use crate::adapters::live::{GopathResolver, LiveStorage};
use crate::adapters::recording::{RecordingResolver, RecordingStorage};
use crate::adapters::replaying::{ReplayingResolver, ReplayingStorage};
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::environment::Environment;
use crate::ports::resolver::ModuleResolver;
use crate::ports::storage::Storage;

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live, recording,
/// replaying). The context is `Send + Sync`, so concurrent extraction shares
/// it behind an `Arc`.
pub struct ServiceContext {
    /// Resolver turning import paths into package metadata.
    pub resolver: Box<dyn ModuleResolver>,
    /// Storage for reading sources and writing the extracted tree.
    pub storage: Box<dyn Storage>,
}

impl ServiceContext {
    /// Creates a context from explicit port implementations.
    #[must_use]
    pub fn new(resolver: Box<dyn ModuleResolver>, storage: Box<dyn Storage>) -> Self {
        Self { resolver, storage }
    }

    /// Creates a live context resolving packages in `env` and using the real disk.
    #[must_use]
    pub fn live(env: Environment) -> Self {
        Self { resolver: Box::new(GopathResolver::new(env)), storage: Box::new(LiveStorage) }
    }

    /// Creates a live context whose interactions are recorded to per-port
    /// cassettes in a timestamped directory under `base`.
    ///
    /// The caller must drop the context before calling
    /// [`RecordingSession::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette directory cannot be created.
    pub fn recording_at(env: Environment, base: &Path) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new_in(base)?;
        let ctx = Self {
            resolver: Box::new(RecordingResolver::new(
                Box::new(GopathResolver::new(env)),
                session.resolver.clone(),
            )),
            storage: Box::new(RecordingStorage::new(Box::new(LiveStorage), session.storage.clone())),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a monolithic cassette file.
    ///
    /// Both ports are served by the same cassette; each port/method pair is
    /// dispatched to its own interaction stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;

        Ok(Self {
            resolver: Box::new(ReplayingResolver::new(CassetteReplayer::new(&cassette))),
            storage: Box::new(ReplayingStorage::new(CassetteReplayer::new(&cassette))),
        })
    }

    /// Creates a replaying context from a directory written by a recording
    /// session (`resolver.cassette.yaml` and `storage.cassette.yaml`).
    ///
    /// # Errors
    ///
    /// Returns an error if either cassette file cannot be read or parsed.
    pub fn replaying_session(dir: &Path) -> Result<Self, String> {
        let resolver = CassetteReplayer::from_file(&dir.join("resolver.cassette.yaml"))?;
        let storage = CassetteReplayer::from_file(&dir.join("storage.cassette.yaml"))?;
        Ok(Self {
            resolver: Box::new(ReplayingResolver::new(resolver)),
            storage: Box::new(ReplayingStorage::new(storage)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use crate::import_path::ImportPath;
    use chrono::Utc;
    use serde_json::json;

    fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        std::fs::write(path, serde_yaml::to_string(&cassette).unwrap()).unwrap();
    }

    #[test]
    fn replaying_context_serves_both_ports_from_one_cassette() {
        let dir = std::env::temp_dir().join("pkgextract_ctx_test_mono");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("full.cassette.yaml");

        write_cassette(
            &path,
            vec![
                Interaction {
                    seq: 0,
                    port: "resolver".into(),
                    method: "resolve".into(),
                    input: json!({"path": "example.com/a"}),
                    output: json!({"ok": {"dir": "/src/example.com/a", "files": ["a.go"], "imports": []}}),
                },
                Interaction {
                    seq: 1,
                    port: "storage".into(),
                    method: "read_to_string".into(),
                    input: json!({"path": "/src/example.com/a/a.go"}),
                    output: json!({"ok": "package a\n"}),
                },
            ],
        );

        let ctx = ServiceContext::replaying(&path).unwrap();
        let meta = ctx.resolver.resolve(&ImportPath::from("example.com/a")).unwrap();
        assert_eq!(meta.files, vec!["a.go"]);
        let source = ctx.storage.read_to_string(&meta.dir.join("a.go")).unwrap();
        assert_eq!(source, "package a\n");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn replaying_session_requires_both_cassettes() {
        let dir = std::env::temp_dir().join("pkgextract_ctx_test_session");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        write_cassette(&dir.join("resolver.cassette.yaml"), vec![]);

        let err = ServiceContext::replaying_session(&dir).err().expect("storage cassette missing");
        assert!(err.contains("storage.cassette.yaml"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn context_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ServiceContext>();
    }
}
