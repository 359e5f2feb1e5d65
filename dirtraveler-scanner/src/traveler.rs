use crate::config::{ScanConfig, StatusCodes};
use crate::error::Result;
use crate::fingerprint::{FingerprintStore, Observation, fingerprint};
use crate::monitor::{MonitorState, QuiescenceDetector};
use crate::probe::{HttpProber, Prober};
use crate::queue::{Job, Task, WorkQueue};
use crate::result::{Completion, Hit, ProgressSnapshot, RunStats, ScanSummary};
use crate::visited::VisitedSet;
use crate::wordlist::{build_candidate_url, load_wordlist};
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub type HitCallback = Arc<dyn Fn(Hit) + Send + Sync>;
pub type ProgressCallback = Arc<dyn Fn(ProgressSnapshot) + Send + Sync>;

#[derive(Debug, Default)]
struct Counters {
    tasks_enqueued: AtomicUsize,
    probes_sent: AtomicUsize,
    network_errors: AtomicUsize,
    hits: AtomicUsize,
    duplicates_suppressed: AtomicUsize,
    expansions: AtomicUsize,
    wordlist_failures: AtomicUsize,
}

impl Counters {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> RunStats {
        RunStats {
            tasks_enqueued: self.tasks_enqueued.load(Ordering::Relaxed),
            probes_sent: self.probes_sent.load(Ordering::Relaxed),
            network_errors: self.network_errors.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            duplicates_suppressed: self.duplicates_suppressed.load(Ordering::Relaxed),
            expansions: self.expansions.load(Ordering::Relaxed),
            wordlist_failures: self.wordlist_failures.load(Ordering::Relaxed),
        }
    }
}

/// Hits reported so far. Once `closed` is set nothing more is recorded,
/// and the hit callback no longer fires.
#[derive(Debug, Default)]
struct HitLog {
    hits: Vec<Hit>,
    closed: bool,
}

/// Everything the workers share during one run
struct TraversalState {
    config: Arc<ScanConfig>,
    prober: Arc<dyn Prober>,
    queue: WorkQueue,
    visited: VisitedSet,
    // URLs already handed to the queue; keeps a candidate from being
    // enqueued twice before any worker has claimed it
    scheduled: VisitedSet,
    fingerprints: FingerprintStore,
    counters: Counters,
    hits: Mutex<HitLog>,
    hit_callback: Option<HitCallback>,
    shutdown: CancellationToken,
}

impl TraversalState {
    fn new(
        config: Arc<ScanConfig>,
        prober: Arc<dyn Prober>,
        hit_callback: Option<HitCallback>,
    ) -> Self {
        Self {
            config,
            prober,
            queue: WorkQueue::new(),
            visited: VisitedSet::new(),
            scheduled: VisitedSet::new(),
            fingerprints: FingerprintStore::new(),
            counters: Counters::default(),
            hits: Mutex::new(HitLog::default()),
            hit_callback,
            shutdown: CancellationToken::new(),
        }
    }

    /// Enqueues one task per wordlist entry under `base_url` at `depth`.
    /// Returns how many tasks were enqueued.
    async fn expand(
        &self,
        base_url: &str,
        wordlist: &Arc<PathBuf>,
        recursive: bool,
        status_codes: &Arc<StatusCodes>,
        depth: usize,
    ) -> Result<usize> {
        if depth > self.config.max_depth {
            debug!(
                "Refusing expansion of {} at depth {} (max {})",
                base_url, depth, self.config.max_depth
            );
            return Ok(0);
        }
        if self.shutdown.is_cancelled() {
            return Ok(0);
        }

        let base = base_url.trim_end_matches('/');
        let words = match load_wordlist(wordlist).await {
            Ok(words) => words,
            Err(e) => {
                Counters::bump(&self.counters.wordlist_failures);
                return Err(e);
            }
        };

        let mut enqueued = 0;
        for word in words {
            if self.shutdown.is_cancelled() {
                break;
            }

            let candidate = match build_candidate_url(base, &word) {
                Ok(url) => url,
                Err(e) => {
                    debug!("Skipping wordlist entry '{}': {}", word, e);
                    continue;
                }
            };

            if self.visited.contains(&candidate).await {
                continue;
            }
            if !self.scheduled.try_claim(&candidate).await {
                continue;
            }

            self.queue
                .enqueue(Task {
                    url: candidate,
                    wordlist: wordlist.clone(),
                    recursive,
                    status_codes: status_codes.clone(),
                    depth,
                })
                .await;
            enqueued += 1;
        }

        self.counters
            .tasks_enqueued
            .fetch_add(enqueued, Ordering::Relaxed);
        debug!("Expanded {} at depth {}: {} tasks", base, depth, enqueued);
        Ok(enqueued)
    }

    /// Claim, probe, report, and recurse for a single task
    async fn probe_and_expand(&self, task: Task) {
        if !self.visited.try_claim(&task.url).await {
            debug!("Already visited {}", task.url);
            return;
        }

        Counters::bump(&self.counters.probes_sent);
        let response = match self.prober.get(&task.url).await {
            Ok(response) => response,
            Err(e) => {
                debug!("Dropping {}: {}", task.url, e);
                Counters::bump(&self.counters.network_errors);
                return;
            }
        };

        if !task.status_codes.contains(response.status_code) {
            return;
        }

        let mut hit = Hit::new(task.url.clone(), response.status_code, task.depth);
        hit.content_length = response.body.len();

        if self.config.detect_duplicates {
            let hash = fingerprint(&response.body);
            match self.fingerprints.observe(&hash, &task.url).await {
                Observation::DuplicateOf(original) => {
                    debug!("{} duplicates the content of {}", task.url, original);
                    Counters::bump(&self.counters.duplicates_suppressed);
                    return;
                }
                Observation::Fresh => hit.fingerprint = Some(hash),
            }
        }

        self.report_hit(hit).await;

        let next_depth = task.depth + 1;
        if task.recursive && next_depth <= self.config.max_depth {
            Counters::bump(&self.counters.expansions);
            if let Err(e) = self
                .expand(&task.url, &task.wordlist, task.recursive, &task.status_codes, next_depth)
                .await
            {
                warn!("Expansion of {} failed: {}", task.url, e);
            }
        }
    }

    async fn report_hit(&self, hit: Hit) {
        // The callback runs under the lock so it cannot race close_reporting
        let mut log = self.hits.lock().await;
        if log.closed {
            debug!("Discarding {} reported after stop", hit.url);
            return;
        }
        info!("{} {}", hit.status_code, hit.url);
        Counters::bump(&self.counters.hits);
        if let Some(ref callback) = self.hit_callback {
            callback(hit.clone());
        }
        log.hits.push(hit);
    }

    /// Stops accepting hits and returns everything reported until now
    async fn close_reporting(&self) -> Vec<Hit> {
        let mut log = self.hits.lock().await;
        log.closed = true;
        log.hits.clone()
    }

    async fn sample(&self, detector: &mut QuiescenceDetector) -> ProgressSnapshot {
        let queue_size = self.queue.size();
        let in_flight = self.queue.outstanding().saturating_sub(queue_size);
        let visited_count = self.visited.len().await;
        detector.observe(queue_size, visited_count, in_flight)
    }
}

async fn worker_loop(state: Arc<TraversalState>, worker_id: usize) {
    debug!("Worker {} started", worker_id);
    let wait = state.config.dequeue_wait;

    loop {
        if state.shutdown.is_cancelled() {
            break;
        }

        match state.queue.dequeue(wait).await {
            Some(Job::Probe(task)) => {
                let _done = state.queue.guard();
                state.probe_and_expand(task).await;
            }
            Some(Job::Stop) => break,
            // Empty for now; more work may still arrive from other workers
            None => continue,
        }
    }

    debug!("Worker {} finished", worker_id);
}

/// Recursive directory enumerator driving a fixed pool of workers
pub struct Traveler {
    config: Arc<ScanConfig>,
    prober: Arc<dyn Prober>,
    hit_callback: Option<HitCallback>,
    progress_callback: Option<ProgressCallback>,
    cancel: CancellationToken,
}

impl Traveler {
    pub fn new(config: ScanConfig) -> Result<Self> {
        let prober = HttpProber::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            prober: Arc::new(prober),
            hit_callback: None,
            progress_callback: None,
            cancel: CancellationToken::new(),
        })
    }

    pub fn with_prober(mut self, prober: Arc<dyn Prober>) -> Self {
        self.prober = prober;
        self
    }

    pub fn with_hit_callback(mut self, callback: HitCallback) -> Self {
        self.hit_callback = Some(callback);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that interrupts the run when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<ScanSummary> {
        self.config.validate()?;
        let started = Instant::now();
        let workers = self.config.workers;

        info!(
            "Starting traversal of {} with {} workers (recursive: {}, max depth: {})",
            self.config.base_url, workers, self.config.recursive, self.config.max_depth
        );

        let state = Arc::new(TraversalState::new(
            self.config.clone(),
            self.prober.clone(),
            self.hit_callback.clone(),
        ));

        let mut worker_handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            worker_handles.push(tokio::spawn(worker_loop(state.clone(), worker_id)));
        }

        let wordlist = Arc::new(self.config.wordlist.clone());
        let status_codes = Arc::new(self.config.status_codes.clone());
        if let Err(e) = state
            .expand(&self.config.base_url, &wordlist, self.config.recursive, &status_codes, 0)
            .await
        {
            // Nothing was queued, so the monitor below quiesces with zero results
            error!("Could not seed traversal: {}", e);
        }

        let mut detector = QuiescenceDetector::new(self.config.idle_threshold);
        let mut ticker = tokio::time::interval(self.config.monitor_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let completion = loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    detector.interrupt();
                    break Completion::Interrupted;
                }
                _ = ticker.tick() => {
                    let snapshot = state.sample(&mut detector).await;
                    if let Some(ref callback) = self.progress_callback {
                        callback(snapshot);
                    }
                    if detector.state() == MonitorState::Quiescent {
                        break Completion::Completed;
                    }
                }
            }
        };

        state.shutdown.cancel();
        state.queue.enqueue_stop(workers).await;

        let join_timeout = self.config.join_timeout;
        let joins = worker_handles.into_iter().map(|mut handle| async move {
            match tokio::time::timeout(join_timeout, &mut handle).await {
                Ok(Ok(())) => true,
                Ok(Err(e)) => {
                    warn!("Worker task failed: {}", e);
                    true
                }
                Err(_) => {
                    handle.abort();
                    false
                }
            }
        });
        let exited = join_all(joins).await.into_iter().filter(|exited| *exited).count();
        if exited < workers {
            warn!("{} of {} workers aborted after join timeout", workers - exited, workers);
        }
        // Aborted workers stop at their next await, which may come after a hit
        let hits = state.close_reporting().await;
        detector.mark_stopped();

        let summary = ScanSummary {
            completion,
            unique_fingerprints: state.fingerprints.len().await,
            visited_count: state.visited.len().await,
            elapsed: started.elapsed(),
            stats: state.counters.snapshot(),
            hits,
        };

        info!(
            "Traversal {}. {} unique pages ({} visited in total)",
            completion.as_str(),
            summary.unique_fingerprints,
            summary.visited_count
        );
        Ok(summary)
    }
}
