pub mod config;
pub mod error;
pub mod fingerprint;
pub mod monitor;
pub mod probe;
pub mod queue;
pub mod result;
pub mod traveler;
pub mod visited;
pub mod wordlist;

pub use config::{ScanConfig, StatusCodes};
pub use error::ScanError;
pub use probe::{HttpProber, ProbeResponse, Prober};
pub use result::{Completion, Hit, ProgressSnapshot, RunStats, ScanSummary};
pub use tokio_util::sync::CancellationToken;
pub use traveler::{HitCallback, ProgressCallback, Traveler};
