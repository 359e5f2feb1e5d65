use std::collections::HashMap;
use tokio::sync::Mutex;

/// Outcome of recording a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// First URL to produce this content
    Fresh,
    /// Content already seen; holds the URL that produced it first
    DuplicateOf(String),
}

/// Content hash -> first URL that produced it
#[derive(Debug, Default)]
pub struct FingerprintStore {
    first_seen: Mutex<HashMap<String, String>>,
}

impl FingerprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomic check-and-insert. The first caller for a given fingerprint
    /// owns it for the rest of the run.
    pub async fn observe(&self, fingerprint: &str, url: &str) -> Observation {
        let mut first_seen = self.first_seen.lock().await;
        match first_seen.get(fingerprint) {
            Some(original) => Observation::DuplicateOf(original.clone()),
            None => {
                first_seen.insert(fingerprint.to_string(), url.to_string());
                Observation::Fresh
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.first_seen.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Hex MD5 of a response body
pub fn fingerprint(body: &[u8]) -> String {
    format!("{:x}", md5::compute(body))
}
