//! Replaying adapter for the `ModuleResolver` port.

use std::sync::Mutex;

use super::extract_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::import_path::ImportPath;
use crate::ports::{ModuleMetadata, ModuleResolver};

/// Replays recorded resolutions from a cassette.
///
/// Resolutions are matched by import path. A path resolved more times than
/// the cassette recorded is an error rather than a guess.
pub struct ReplayingResolver {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingResolver {
    /// Creates a new replaying resolver from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ModuleResolver for ReplayingResolver {
    fn resolve(
        &self,
        path: &ImportPath,
    ) -> Result<ModuleMetadata, Box<dyn std::error::Error + Send + Sync>> {
        let interaction = {
            let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
            replayer.take_for_path("resolver", "resolve", path.as_str())
        };
        let Some(interaction) = interaction else {
            return Err(format!("cassette out of sync: no recorded resolution of {path}").into());
        };
        extract_result(&interaction.output, "resolver::resolve")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(interactions: Vec<Interaction>) -> CassetteReplayer {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        CassetteReplayer::new(&cassette)
    }

    fn resolve_interaction(seq: u64, path: &str, output: serde_json::Value) -> Interaction {
        Interaction {
            seq,
            port: "resolver".into(),
            method: "resolve".into(),
            input: json!({ "path": path }),
            output,
        }
    }

    #[test]
    fn replays_metadata() {
        let replayer = make_replayer(vec![resolve_interaction(
            0,
            "example.com/a",
            json!({"ok": {"dir": "/src/example.com/a", "files": ["a.go"], "imports": ["fmt"]}}),
        )]);
        let resolver = ReplayingResolver::new(replayer);
        let meta = resolver.resolve(&"example.com/a".into()).unwrap();
        assert_eq!(meta.files, vec!["a.go"]);
        assert_eq!(meta.imports, vec![ImportPath::from("fmt")]);
    }

    #[test]
    fn replays_recorded_failure() {
        let replayer = make_replayer(vec![resolve_interaction(
            0,
            "example.com/x",
            json!({"err": "cannot find package"}),
        )]);
        let resolver = ReplayingResolver::new(replayer);
        let err = resolver.resolve(&"example.com/x".into()).unwrap_err();
        assert_eq!(err.to_string(), "cannot find package");
    }

    #[test]
    fn resolutions_may_arrive_in_any_order() {
        let replayer = make_replayer(vec![
            resolve_interaction(0, "example.com/a", json!({"err": "a failed"})),
            resolve_interaction(1, "example.com/b", json!({"err": "b failed"})),
        ]);
        let resolver = ReplayingResolver::new(replayer);
        assert_eq!(resolver.resolve(&"example.com/b".into()).unwrap_err().to_string(), "b failed");
        assert_eq!(resolver.resolve(&"example.com/a".into()).unwrap_err().to_string(), "a failed");
    }

    #[test]
    fn detects_unrecorded_resolution() {
        let replayer = make_replayer(vec![resolve_interaction(0, "example.com/a", json!({"ok": {}}))]);
        let resolver = ReplayingResolver::new(replayer);
        let err = resolver.resolve(&"example.com/b".into()).unwrap_err();
        assert!(err.to_string().contains("out of sync"));
    }
}
