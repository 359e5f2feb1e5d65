use crate::result::ProgressSnapshot;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Running,
    Quiescent,
    Stopped,
}

/// Termination detector fed by periodic samples of the run.
///
/// Every sample where the visited count did not grow bumps an idle counter;
/// growth resets it. The run is quiescent once the queue is empty, no worker
/// is mid-probe and the idle counter exceeds the threshold. The threshold
/// absorbs the window where the queue looks empty while a worker is between
/// a hit and enqueuing the next level.
#[derive(Debug, Clone)]
pub struct QuiescenceDetector {
    idle_threshold: u32,
    idle_ticks: u32,
    last_visited: usize,
    state: MonitorState,
}

impl QuiescenceDetector {
    pub fn new(idle_threshold: u32) -> Self {
        Self {
            idle_threshold,
            idle_ticks: 0,
            last_visited: 0,
            state: MonitorState::Running,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn idle_ticks(&self) -> u32 {
        self.idle_ticks
    }

    /// Records one sample and advances RUNNING -> QUIESCENT when due
    pub fn observe(
        &mut self,
        queue_size: usize,
        visited_count: usize,
        in_flight: usize,
    ) -> ProgressSnapshot {
        let delta = visited_count.saturating_sub(self.last_visited);
        self.last_visited = visited_count;

        if self.state == MonitorState::Running {
            if delta > 0 {
                self.idle_ticks = 0;
            } else {
                self.idle_ticks = self.idle_ticks.saturating_add(1);
            }

            if queue_size == 0 && in_flight == 0 && self.idle_ticks > self.idle_threshold {
                info!(
                    "Traversal quiescent after {} idle samples ({} URLs visited)",
                    self.idle_ticks, visited_count
                );
                self.state = MonitorState::Quiescent;
            }
        }

        ProgressSnapshot {
            queue_size,
            visited_count,
            delta,
            in_flight,
        }
    }

    /// Operator abort: jump straight to STOPPED from any state
    pub fn interrupt(&mut self) {
        if self.state != MonitorState::Stopped {
            info!("Traversal interrupted");
        }
        self.state = MonitorState::Stopped;
    }

    /// Called once the workers have been told to stop and joined
    pub fn mark_stopped(&mut self) {
        self.state = MonitorState::Stopped;
    }
}
