use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_IDLE_THRESHOLD: u32 = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("DirTraveler/", env!("CARGO_PKG_VERSION"));

/// Set of HTTP status codes that count as "found"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCodes(BTreeSet<u16>);

impl StatusCodes {
    pub fn new(codes: impl IntoIterator<Item = u16>) -> Self {
        Self(codes.into_iter().collect())
    }

    pub fn contains(&self, code: u16) -> bool {
        self.0.contains(&code)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }
}

impl Default for StatusCodes {
    fn default() -> Self {
        Self::new(200..=399)
    }
}

impl FromStr for StatusCodes {
    type Err = ScanError;

    /// Accepts codes separated by whitespace or commas, and inclusive
    /// ranges written as `200-299`.
    fn from_str(s: &str) -> Result<Self> {
        let mut codes = BTreeSet::new();

        for token in s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            if let Some((start, end)) = token.split_once('-') {
                let start = parse_code(start)?;
                let end = parse_code(end)?;
                if start > end {
                    return Err(ScanError::InvalidStatusCodes(format!(
                        "range {} is reversed",
                        token
                    )));
                }
                codes.extend(start..=end);
            } else {
                codes.insert(parse_code(token)?);
            }
        }

        if codes.is_empty() {
            return Err(ScanError::InvalidStatusCodes(format!(
                "'{}' contains no status codes",
                s
            )));
        }

        Ok(Self(codes))
    }
}

fn parse_code(raw: &str) -> Result<u16> {
    let code: u16 = raw
        .trim()
        .parse()
        .map_err(|_| ScanError::InvalidStatusCodes(format!("'{}' is not a status code", raw)))?;
    if !(100..=599).contains(&code) {
        return Err(ScanError::InvalidStatusCodes(format!(
            "{} is outside 100-599",
            code
        )));
    }
    Ok(code)
}

impl fmt::Display for StatusCodes {
    // Collapses consecutive runs so the default prints as "200-399"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        let mut iter = self.0.iter().copied().peekable();
        while let Some(start) = iter.next() {
            let mut end = start;
            while let Some(next) = end.checked_add(1).filter(|next| iter.peek() == Some(next)) {
                end = next;
                iter.next();
            }
            if start == end {
                parts.push(start.to_string());
            } else {
                parts.push(format!("{}-{}", start, end));
            }
        }
        write!(f, "{}", parts.join(","))
    }
}

/// Immutable parameters of a single traversal run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub base_url: String,
    pub wordlist: PathBuf,
    pub recursive: bool,
    pub status_codes: StatusCodes,
    pub max_depth: usize,
    pub workers: usize,
    pub detect_duplicates: bool,
    pub request_timeout: Duration,
    pub dequeue_wait: Duration,
    pub monitor_interval: Duration,
    /// Idle monitor ticks tolerated with an empty queue before shutdown.
    /// Higher values stop later but are less likely to stop while a worker
    /// is about to enqueue the next level.
    pub idle_threshold: u32,
    pub join_timeout: Duration,
    pub user_agent: String,
    pub follow_redirects: bool,
}

impl ScanConfig {
    pub fn new(base_url: impl Into<String>, wordlist: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            wordlist: wordlist.into(),
            recursive: false,
            status_codes: StatusCodes::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            workers: DEFAULT_WORKERS,
            detect_duplicates: true,
            request_timeout: Duration::from_secs(5),
            dequeue_wait: Duration::from_secs(1),
            monitor_interval: Duration::from_secs(1),
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            join_timeout: Duration::from_secs(1),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            follow_redirects: false,
        }
    }

    pub fn with_recursion(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_status_codes(mut self, codes: StatusCodes) -> Self {
        self.status_codes = codes;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_duplicate_detection(mut self, enabled: bool) -> Self {
        self.detect_duplicates = enabled;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_dequeue_wait(mut self, wait: Duration) -> Self {
        self.dequeue_wait = wait;
        self
    }

    pub fn with_monitor_interval(mut self, interval: Duration) -> Self {
        self.monitor_interval = interval;
        self
    }

    pub fn with_idle_threshold(mut self, ticks: u32) -> Self {
        self.idle_threshold = ticks;
        self
    }

    pub fn with_join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Checks the parameters that would otherwise fail halfway through a run
    pub fn validate(&self) -> Result<()> {
        let parsed = Url::parse(&self.base_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScanError::InvalidUrl(format!(
                "{}: only http and https are supported",
                self.base_url
            )));
        }
        if self.workers == 0 {
            return Err(ScanError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.status_codes.is_empty() {
            return Err(ScanError::InvalidConfig(
                "at least one accepted status code is required".to_string(),
            ));
        }
        Ok(())
    }
}
