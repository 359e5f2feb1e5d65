// Wordlist loading and candidate URL construction

use crate::error::{Result, ScanError};
use std::path::Path;
use url::Url;

/// Reads the wordlist; every non-blank line, trimmed, is one path segment.
/// The file is re-read on every expansion so no copy outlives the call.
pub async fn load_wordlist(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ScanError::WordlistUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(parse_wordlist(&content))
}

pub fn parse_wordlist(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Joins a wordlist entry onto a base URL, treating the base as a directory.
/// The entry is appended as text, so `?` and `#` in it keep their meaning.
pub fn build_candidate_url(base_url: &str, word: &str) -> Result<String> {
    let mut base = Url::parse(base_url)
        .map_err(|e| ScanError::InvalidUrl(format!("Invalid base URL '{}': {}", base_url, e)))?;
    base.set_query(None);
    base.set_fragment(None);

    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        word.trim_start_matches('/')
    );
    let url = Url::parse(&joined)
        .map_err(|e| ScanError::InvalidUrl(format!("Invalid candidate '{}': {}", joined, e)))?;

    Ok(url.to_string())
}
