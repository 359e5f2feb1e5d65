use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A probe that answered with an accepted status code and fresh content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub url: String,
    pub status_code: u16,
    pub depth: usize,
    pub content_length: usize,
    pub fingerprint: Option<String>,
}

impl Hit {
    pub fn new(url: String, status_code: u16, depth: usize) -> Self {
        Self {
            url,
            status_code,
            depth,
            content_length: 0,
            fingerprint: None,
        }
    }
}

/// Periodic liveness sample emitted by the progress monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub queue_size: usize,
    pub visited_count: usize,
    pub delta: usize,
    pub in_flight: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Completion {
    Completed,
    Interrupted,
}

impl Completion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Completion::Completed => "completed",
            Completion::Interrupted => "interrupted",
        }
    }
}

/// Counters accumulated by the workers over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub tasks_enqueued: usize,
    pub probes_sent: usize,
    pub network_errors: usize,
    pub hits: usize,
    pub duplicates_suppressed: usize,
    pub expansions: usize,
    pub wordlist_failures: usize,
}

/// Final report of a traversal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    pub completion: Completion,
    pub unique_fingerprints: usize,
    pub visited_count: usize,
    pub elapsed: Duration,
    pub stats: RunStats,
    pub hits: Vec<Hit>,
}

impl ScanSummary {
    pub fn was_interrupted(&self) -> bool {
        self.completion == Completion::Interrupted
    }
}
