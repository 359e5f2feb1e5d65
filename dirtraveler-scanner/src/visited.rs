use std::collections::HashSet;
use tokio::sync::Mutex;
use url::Url;

/// Admission gate: every URL is claimed by exactly one caller
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically inserts `url` and returns true only if it was unseen
    pub async fn try_claim(&self, url: &str) -> bool {
        let key = normalize_url(url);
        self.urls.lock().await.insert(key)
    }

    pub async fn contains(&self, url: &str) -> bool {
        let key = normalize_url(url);
        self.urls.lock().await.contains(&key)
    }

    pub async fn len(&self) -> usize {
        self.urls.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Canonical form used as the visited key: fragment dropped and a trailing
/// slash ignored, so `/admin/` and `/admin` are the same resource.
pub fn normalize_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            let path = parsed.path().to_string();
            if path.len() > 1 && path.ends_with('/') {
                parsed.set_path(path.trim_end_matches('/'));
            }
            parsed.to_string()
        }
        Err(_) => url.trim_end_matches('/').to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn claim_succeeds_once() {
        let visited = VisitedSet::new();
        assert!(visited.try_claim("http://ex.test/admin").await);
        assert!(!visited.try_claim("http://ex.test/admin").await);
        assert!(!visited.try_claim("http://ex.test/admin/").await);
        assert!(!visited.try_claim("http://ex.test/admin#top").await);
        assert_eq!(visited.len().await, 1);
    }

    #[tokio::test]
    async fn racing_claims_have_a_single_winner() {
        let visited = Arc::new(VisitedSet::new());
        let mut handles = Vec::new();
        for _ in 0..32 {
            let visited = visited.clone();
            handles.push(tokio::spawn(async move {
                let mut won = 0;
                for i in 0..10 {
                    if visited.try_claim(&format!("http://ex.test/p{}", i)).await {
                        won += 1;
                    }
                }
                won
            }));
        }

        let mut winners = 0;
        for handle in handles {
            winners += handle.await.unwrap();
        }
        assert_eq!(winners, 10);
        assert_eq!(visited.len().await, 10);
    }

    #[test]
    fn normalization_keeps_root_and_query() {
        assert_eq!(normalize_url("http://ex.test"), "http://ex.test/");
        assert_eq!(normalize_url("http://ex.test/"), "http://ex.test/");
        assert_eq!(normalize_url("http://ex.test/a/b/"), "http://ex.test/a/b");
        assert_eq!(normalize_url("http://ex.test/a?x=1#f"), "http://ex.test/a?x=1");
    }
}
