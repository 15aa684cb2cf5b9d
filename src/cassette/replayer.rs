//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use super::format::{Cassette, Interaction};

/// Replays interactions from a loaded cassette, serving them sequentially
/// per port/method pair.
///
/// Each pair has its own queue, so interleaving between ports does not have
/// to match the recording; only the order within one pair does.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Load a cassette YAML file and create a replayer for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        Ok(Self::new(&cassette))
    }

    /// Number of interactions not yet served, across all ports.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    /// Remove and return the earliest remaining interaction for the given
    /// port and method whose recorded `input.path` equals `path`.
    ///
    /// Interactions for other paths keep their place, so a session recorded
    /// with several packages in flight replays regardless of the order the
    /// calls arrive in.
    pub fn take_for_path(&mut self, port: &str, method: &str, path: &str) -> Option<Interaction> {
        let queue = self.queues.get_mut(&(port.to_string(), method.to_string()))?;
        let index = queue.iter().position(|interaction| interaction.input_path() == Some(path))?;
        queue.remove(index)
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the given
    /// port/method combination, naming what was requested and which
    /// port/method pairs still have interactions left.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        if let Some(interaction) = self.queues.get_mut(&key).and_then(VecDeque::pop_front) {
            return interaction;
        }

        let mut available: Vec<String> = self
            .queues
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|((p, m), queue)| format!("{p}::{m} ({})", queue.len()))
            .collect();
        available.sort();
        panic!(
            "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
             Remaining port::method pairs: [{}]",
            available.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        }
    }

    fn interaction(seq: u64, port: &str, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: port.into(), method: method.into(), input: json!({}), output }
    }

    #[test]
    fn replays_each_pair_in_recorded_order() {
        let cassette = make_cassette(vec![
            interaction(0, "resolver", "resolve", json!({"ok": 1})),
            interaction(1, "storage", "read_to_string", json!({"ok": "x"})),
            interaction(2, "resolver", "resolve", json!({"ok": 2})),
        ]);

        let mut replayer = CassetteReplayer::new(&cassette);
        assert_eq!(replayer.remaining(), 3);

        assert_eq!(replayer.next_interaction("resolver", "resolve").seq, 0);
        assert_eq!(replayer.next_interaction("resolver", "resolve").seq, 2);
        assert_eq!(replayer.next_interaction("storage", "read_to_string").seq, 1);
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    fn takes_interactions_by_path_out_of_recorded_order() {
        let path_interaction = |seq: u64, path: &str| Interaction {
            seq,
            port: "storage".into(),
            method: "read_to_string".into(),
            input: json!({ "path": path }),
            output: json!({ "ok": path }),
        };
        let cassette = make_cassette(vec![
            path_interaction(0, "/src/a.go"),
            path_interaction(1, "/src/b.go"),
            path_interaction(2, "/src/a.go"),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);

        assert_eq!(replayer.take_for_path("storage", "read_to_string", "/src/b.go").unwrap().seq, 1);
        assert_eq!(replayer.take_for_path("storage", "read_to_string", "/src/a.go").unwrap().seq, 0);
        assert_eq!(replayer.take_for_path("storage", "read_to_string", "/src/a.go").unwrap().seq, 2);
        assert!(replayer.take_for_path("storage", "read_to_string", "/src/a.go").is_none());
        assert!(replayer.take_for_path("resolver", "resolve", "x").is_none());
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn exhausted_pair_panics() {
        let cassette = make_cassette(vec![interaction(0, "storage", "write", json!({"ok": null}))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("storage", "write");
        let _ = replayer.next_interaction("storage", "write");
    }

    #[test]
    #[should_panic(expected = "storage::write (1)")]
    fn panic_lists_remaining_pairs() {
        let cassette = make_cassette(vec![interaction(0, "storage", "write", json!({"ok": null}))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("resolver", "resolve");
    }

    #[test]
    fn from_file_reports_missing_cassette() {
        let err = CassetteReplayer::from_file(Path::new("/nonexistent/x.cassette.yaml"))
            .err()
            .expect("missing file should fail");
        assert!(err.contains("Failed to read cassette file"));
    }
}
