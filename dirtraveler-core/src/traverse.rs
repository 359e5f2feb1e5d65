use colored::Colorize;
use dirtraveler_scanner::{
    CancellationToken, Hit, HitCallback, ProgressCallback, ProgressSnapshot, ScanConfig,
    ScanSummary, Traveler,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Options for configuring a traversal
pub struct TraverseOptions {
    pub config: ScanConfig,
    pub show_progress_bars: bool,
    /// Cancel the run on Ctrl-C
    pub handle_interrupt: bool,
}

/// Callback for reporting individual hits as they come in
pub type TraverseHitCallback = Arc<dyn Fn(Hit) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// One colored console line per hit
pub fn format_hit_line(hit: &Hit) -> String {
    let status = hit.status_code.to_string();
    let status = match hit.status_code {
        200..=299 => status.bright_green(),
        300..=399 => status.cyan(),
        400..=499 => status.yellow(),
        500..=599 => status.red(),
        _ => status.white(),
    };
    format!("{} {}", status, hit.url)
}

/// Progress line in the shape "Queue: 3 | URLs visited: 41 (+5)"
pub fn format_progress(snapshot: &ProgressSnapshot) -> String {
    format!(
        "Queue: {} | URLs visited: {} (+{})",
        snapshot.queue_size, snapshot.visited_count, snapshot.delta
    )
}

/// Cancels `token` when the process receives Ctrl-C
pub fn install_interrupt_handler(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, stopping traversal");
                token.cancel();
            }
            Err(e) => warn!("Failed to install Ctrl-C handler: {}", e),
        }
    });
}

/// Execute a traversal with the given options.
/// Returns the run summary, including partial results when interrupted.
pub async fn execute_traversal(
    options: TraverseOptions,
    hit_callback: Option<TraverseHitCallback>,
) -> Result<ScanSummary, String> {
    let TraverseOptions {
        config,
        show_progress_bars,
        handle_interrupt,
    } = options;

    // Single spinner for overall progress (only if enabled)
    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .map_err(|e| format!("Invalid progress template: {}", e))?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting directory scanning...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let mut traveler = Traveler::new(config).map_err(|e| e.to_string())?;

    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let progress: ProgressCallback = Arc::new(move |snapshot: ProgressSnapshot| {
            pb_clone.set_message(format_progress(&snapshot));
        });
        traveler = traveler.with_progress_callback(progress);
    }

    // Hits print above the spinner so it is not torn
    let pb_for_hits = progress_bar.clone();
    let on_hit: HitCallback = Arc::new(move |hit: Hit| {
        if let Some(ref pb) = pb_for_hits {
            pb.println(format_hit_line(&hit));
        }
        if let Some(ref callback) = hit_callback {
            callback(hit);
        }
    });
    traveler = traveler.with_hit_callback(on_hit);

    if handle_interrupt {
        install_interrupt_handler(traveler.cancellation_token());
    }

    let result = traveler.run().await.map_err(|e| e.to_string());

    if let Some(ref pb) = progress_bar {
        match &result {
            Ok(summary) if summary.was_interrupted() => pb.finish_with_message(format!(
                "Scan interrupted... {} URLs visited",
                summary.visited_count
            )),
            Ok(summary) => pb.finish_with_message(format!(
                "Scan complete! {} URLs visited",
                summary.visited_count
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    result
}
