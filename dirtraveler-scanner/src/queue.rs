use crate::config::StatusCodes;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, Notify};

/// One URL to probe. Immutable once enqueued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub url: String,
    pub wordlist: Arc<PathBuf>,
    pub recursive: bool,
    pub status_codes: Arc<StatusCodes>,
    pub depth: usize,
}

/// Unit handed to a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Probe(Task),
    /// Sentinel: the receiving worker exits its loop
    Stop,
}

/// Unbounded FIFO shared by every worker.
///
/// Besides the queued jobs it tracks `outstanding` probe tasks: enqueued
/// and not yet marked done. A task stays outstanding while its worker
/// probes and expands it, so children are counted before the parent is
/// released and the count only reaches zero when there is truly nothing
/// left to do.
#[derive(Debug, Default)]
pub struct WorkQueue {
    jobs: Mutex<VecDeque<Job>>,
    len: AtomicUsize,
    outstanding: AtomicUsize,
    available: Notify,
}

/// Marks a dequeued task done when dropped
pub struct TaskGuard<'a> {
    queue: &'a WorkQueue,
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        self.queue.task_done();
    }
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn enqueue(&self, task: Task) {
        self.push(Job::Probe(task)).await;
    }

    /// Pushes one stop sentinel per worker
    pub async fn enqueue_stop(&self, count: usize) {
        for _ in 0..count {
            self.push(Job::Stop).await;
        }
    }

    async fn push(&self, job: Job) {
        if matches!(job, Job::Probe(_)) {
            self.outstanding.fetch_add(1, Ordering::SeqCst);
        }
        {
            let mut jobs = self.jobs.lock().await;
            jobs.push_back(job);
            self.len.fetch_add(1, Ordering::SeqCst);
        }
        self.available.notify_one();
    }

    /// Waits up to `wait` for a job. `None` means the queue is empty right
    /// now, not that the run is over.
    pub async fn dequeue(&self, wait: Duration) -> Option<Job> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            if let Some(job) = self.try_pop().await {
                return Some(job);
            }
            // notify_one stores a permit when nobody is waiting, so a push
            // between try_pop and here still wakes us
            if tokio::time::timeout_at(deadline, self.available.notified())
                .await
                .is_err()
            {
                return self.try_pop().await;
            }
        }
    }

    async fn try_pop(&self) -> Option<Job> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs.pop_front();
        if job.is_some() {
            self.len.fetch_sub(1, Ordering::SeqCst);
        }
        job
    }

    /// Releases one outstanding task. Prefer [`WorkQueue::guard`].
    pub fn task_done(&self) {
        let _ = self
            .outstanding
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    pub fn guard(&self) -> TaskGuard<'_> {
        TaskGuard { queue: self }
    }

    /// Tasks queued or still being processed
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Approximate depth, for monitoring only
    pub fn size(&self) -> usize {
        self.len.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}
