//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Serves a cassette's interactions back in recorded order, with one queue
/// per `port::method` so unrelated calls may interleave differently.
pub struct CassetteReplayer {
    name: String,
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
        Self {
            name: cassette.name.clone(),
            queues,
        }
    }

    /// Take the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the given
    /// port/method combination. A replayed run that calls a port more often
    /// than the recorded run did is a test failure, not a recoverable error.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut available: Vec<String> = self
                .queues
                .keys()
                .map(|(p, m)| format!("{p}::{m}"))
                .collect();
            available.sort();
            panic!(
                "Cassette exhausted: {name} has no interactions recorded for {port}::{method}. \
                 Available: [{}]",
                available.join(", "),
                name = self.name,
            );
        };
        queue.pop_front().unwrap_or_else(|| {
            panic!(
                "Cassette exhausted: every {port}::{method} interaction in {name} was served",
                name = self.name,
            )
        })
    }

    /// Interactions not yet served, across all ports.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }
}
