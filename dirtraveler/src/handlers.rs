use chrono::Utc;
use clap::ArgMatches;
use colored::Colorize;
use dirtraveler_core::report::{ReportData, ReportFormat, generate_report, save_report};
use dirtraveler_core::traverse::{
    TraverseHitCallback, TraverseOptions, execute_traversal, format_hit_line,
};
use dirtraveler_scanner::{Hit, ScanConfig, ScanSummary, StatusCodes};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Exit status for a run stopped by the operator (128 + SIGINT)
pub const EXIT_INTERRUPTED: i32 = 130;

/// Expand `~` and environment variables in a wordlist argument
pub fn expand_wordlist_path(raw: &str) -> PathBuf {
    let expanded = shellexpand::full(raw).unwrap_or_else(|_| shellexpand::tilde(raw));
    PathBuf::from(expanded.as_ref())
}

/// Parse the values given to `-c/--codes` into a status code set.
/// Values may be separate arguments or a single comma/space separated list.
pub fn parse_status_codes(values: &[String]) -> Result<StatusCodes, String> {
    values
        .join(" ")
        .parse::<StatusCodes>()
        .map_err(|e| e.to_string())
}

/// Map `-v` occurrences to a tracing filter directive
pub fn log_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

pub fn exit_code(summary: &ScanSummary) -> i32 {
    if summary.was_interrupted() {
        EXIT_INTERRUPTED
    } else {
        0
    }
}

/// Closing line, e.g. "Scan complete! Found 3 URLs (41 visited in total)"
pub fn format_summary(summary: &ScanSummary) -> String {
    let prefix = if summary.was_interrupted() {
        "Scan interrupted..."
    } else {
        "Scan complete!"
    };
    format!(
        "{} Found {} URLs ({} visited in total)",
        prefix, summary.unique_fingerprints, summary.visited_count
    )
}

/// `--no-detect-duplicates` turns detection off; `--detect-duplicates` only
/// restates the default
pub fn duplicate_detection(matches: &ArgMatches) -> bool {
    matches.get_flag("detect-duplicates") || !matches.get_flag("no-detect-duplicates")
}

pub fn build_scan_config(matches: &ArgMatches) -> Result<ScanConfig, String> {
    let url = matches
        .get_one::<Url>("url")
        .ok_or_else(|| "--url is required".to_string())?;
    let wordlist = matches
        .get_one::<String>("wordlist")
        .ok_or_else(|| "--wordlist is required".to_string())?;

    let codes: Vec<String> = matches
        .get_many::<String>("codes")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let status_codes = if codes.is_empty() {
        StatusCodes::default()
    } else {
        parse_status_codes(&codes)?
    };

    let mut config = ScanConfig::new(url.as_str(), expand_wordlist_path(wordlist))
        .with_recursion(matches.get_flag("recursive"))
        .with_status_codes(status_codes)
        .with_duplicate_detection(duplicate_detection(matches))
        .with_follow_redirects(matches.get_flag("follow-redirects"));

    if let Some(depth) = matches.get_one::<usize>("depth") {
        config = config.with_max_depth(*depth);
    }
    if let Some(threads) = matches.get_one::<usize>("threads") {
        config = config.with_workers(*threads);
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config = config.with_request_timeout(Duration::from_secs(*timeout));
    }

    config.validate().map_err(|e| e.to_string())?;
    debug!("Scan configuration: {:?}", config);
    Ok(config)
}

fn print_scan_header(config: &ScanConfig) {
    println!("{} {}", "Target:".bright_white().bold(), config.base_url);
    println!(
        "{} {}",
        "Wordlist:".bright_white().bold(),
        config.wordlist.display()
    );
    println!("{} {}", "Workers:".bright_white().bold(), config.workers);
    println!("{} {}", "Codes:".bright_white().bold(), config.status_codes);
    if config.recursive {
        println!(
            "{} enabled (max depth {})",
            "Recursion:".bright_white().bold(),
            config.max_depth
        );
    } else {
        println!("{} disabled", "Recursion:".bright_white().bold());
    }
    println!();
}

/// Run a scan from parsed arguments and return the process exit code
pub async fn handle_scan(matches: &ArgMatches) -> Result<i32, String> {
    let config = build_scan_config(matches)?;
    let quiet = matches.get_flag("quiet");
    let output = matches.get_one::<PathBuf>("output").cloned();
    let format: ReportFormat = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text")
        .parse()?;

    if !quiet {
        print_scan_header(&config);
    }

    // Without the spinner nothing else prints hits, so do it here
    let hit_callback: Option<TraverseHitCallback> = if quiet {
        Some(Arc::new(|hit: Hit| println!("{}", format_hit_line(&hit))))
    } else {
        None
    };

    info!(
        "Scanning {} with {} ({} workers)",
        config.base_url,
        config.wordlist.display(),
        config.workers
    );
    let started_at = Utc::now();
    let options = TraverseOptions {
        config: config.clone(),
        show_progress_bars: !quiet,
        handle_interrupt: true,
    };
    let summary = execute_traversal(options, hit_callback).await?;

    let line = format_summary(&summary);
    if summary.was_interrupted() {
        println!("\n{}", line.bright_yellow());
        println!("{}", "Exiting.....".red());
    } else {
        println!("\n{}", line.blue());
    }

    let code = exit_code(&summary);
    if let Some(path) = output {
        let data = ReportData::new(config, summary, started_at);
        let report = generate_report(&data, format)?;
        save_report(&report, &path)
            .map_err(|e| format!("Failed to write report to {}: {}", path.display(), e))?;
        info!("Wrote {:?} report to {}", format, path.display());
        println!(
            "{} Report saved to {}",
            "✓".green().bold(),
            path.display().to_string().bright_white()
        );
    }

    Ok(code)
}
