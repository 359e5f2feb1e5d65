// Tests for report generation functionality

use chrono::{TimeZone, Utc};
use dirtraveler_core::report::{
    ReportData, ReportFormat, generate_csv_report, generate_json_report, generate_markdown_report,
    generate_report, generate_text_report, save_report,
};
use dirtraveler_scanner::{Completion, Hit, RunStats, ScanConfig, ScanSummary};
use std::time::Duration;
use tempfile::TempDir;

fn hit(url: &str, status_code: u16, depth: usize) -> Hit {
    let mut hit = Hit::new(url.to_string(), status_code, depth);
    hit.content_length = 512;
    hit.fingerprint = Some(format!("{:032x}", url.len()));
    hit
}

fn sample_data(completion: Completion, hits: Vec<Hit>) -> ReportData {
    let config = ScanConfig::new("http://ex.test", "/tmp/common.txt")
        .with_recursion(true)
        .with_max_depth(2);
    let summary = ScanSummary {
        completion,
        unique_fingerprints: hits.len(),
        visited_count: 40,
        elapsed: Duration::from_millis(2500),
        stats: RunStats {
            tasks_enqueued: 40,
            probes_sent: 40,
            network_errors: 1,
            hits: hits.len(),
            duplicates_suppressed: 3,
            expansions: 2,
            wordlist_failures: 0,
        },
        hits,
    };
    let started_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    ReportData::new(config, summary, started_at)
}

fn default_hits() -> Vec<Hit> {
    vec![
        hit("http://ex.test/admin", 200, 0),
        hit("http://ex.test/admin/backup", 200, 1),
        hit("http://ex.test/private", 403, 0),
        hit("http://ex.test/old", 301, 0),
    ]
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert_eq!("text".parse::<ReportFormat>(), Ok(ReportFormat::Text));
    assert_eq!("json".parse::<ReportFormat>(), Ok(ReportFormat::Json));
    assert_eq!("csv".parse::<ReportFormat>(), Ok(ReportFormat::Csv));
    assert_eq!("markdown".parse::<ReportFormat>(), Ok(ReportFormat::Markdown));
    assert_eq!("md".parse::<ReportFormat>(), Ok(ReportFormat::Markdown));
}

#[test]
fn test_report_format_from_str_case_insensitive() {
    assert_eq!("TEXT".parse::<ReportFormat>(), Ok(ReportFormat::Text));
    assert_eq!("Json".parse::<ReportFormat>(), Ok(ReportFormat::Json));
}

#[test]
fn test_report_format_from_str_invalid() {
    assert!("html".parse::<ReportFormat>().is_err());
    assert!("".parse::<ReportFormat>().is_err());
}

// ============================================================================
// Text Report Tests
// ============================================================================

#[test]
fn test_text_report_contains_summary() {
    let report = generate_text_report(&sample_data(Completion::Completed, default_hits()));

    assert!(report.contains("DIRTRAVELER SCAN REPORT"));
    assert!(report.contains("Target:       http://ex.test"));
    assert!(report.contains("Status:       Completed"));
    assert!(report.contains("Scan Date:    2024-05-01 12:00:00 UTC"));
    assert!(report.contains("Recursion:    enabled (max depth 2)"));
    assert!(report.contains("Codes:        200-399"));
    assert!(report.contains("URLs found:           4"));
    assert!(report.contains("URLs visited:         40"));
    assert!(report.contains("Duplicates skipped:   3"));
}

#[test]
fn test_text_report_groups_by_status() {
    let report = generate_text_report(&sample_data(Completion::Completed, default_hits()));

    assert!(report.contains("[200] Success (2 found)"));
    assert!(report.contains("[301] Redirect (1 found)"));
    assert!(report.contains("[403] Client Error (1 found)"));

    let success = report.find("[200] Success").unwrap();
    let redirect = report.find("[301] Redirect").unwrap();
    let client_error = report.find("[403] Client Error").unwrap();
    assert!(success < redirect && redirect < client_error);
}

#[test]
fn test_text_report_interrupted_without_hits() {
    let report = generate_text_report(&sample_data(Completion::Interrupted, vec![]));

    assert!(report.contains("Status:       Interrupted"));
    assert!(report.contains("URLs found:           0"));
    assert!(!report.contains("DISCOVERED PATHS"));
}

// ============================================================================
// Machine-readable Report Tests
// ============================================================================

#[test]
fn test_json_report_structure() {
    let json = generate_json_report(&sample_data(Completion::Completed, default_hits())).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let report = &value["report"];
    assert_eq!(report["metadata"]["generator"], "DirTraveler");
    assert_eq!(report["scan"]["target"], "http://ex.test");
    assert_eq!(report["scan"]["status"], "completed");
    assert_eq!(report["scan"]["max_depth"], 2);
    assert_eq!(report["summary"]["total_hits"], 4);
    assert_eq!(report["summary"]["total_visited"], 40);
    assert_eq!(report["summary"]["stats"]["network_errors"], 1);
    assert_eq!(report["hits"].as_array().unwrap().len(), 4);
    assert_eq!(report["hits"][0]["url"], "http://ex.test/admin");
}

#[test]
fn test_csv_report_rows() {
    let csv = generate_csv_report(&sample_data(Completion::Completed, default_hits()));
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], "status_code,url,path,depth,content_length,fingerprint");
    assert_eq!(lines.len(), 5);
    assert!(lines[2].starts_with("200,http://ex.test/admin/backup,/admin/backup,1,512,"));
}

#[test]
fn test_csv_report_quotes_commas() {
    let csv = generate_csv_report(&sample_data(
        Completion::Completed,
        vec![hit("http://ex.test/a,b", 200, 0)],
    ));
    assert!(csv.contains("\"http://ex.test/a,b\""));
}

#[test]
fn test_markdown_report_table() {
    let markdown = generate_markdown_report(&sample_data(Completion::Completed, default_hits()));

    assert!(markdown.starts_with("# DirTraveler report for http://ex.test"));
    assert!(markdown.contains("| 200 | [/admin](http://ex.test/admin) | 0 | 512 |"));
    assert!(markdown.contains("| 403 | [/private](http://ex.test/private) | 0 | 512 |"));
}

#[test]
fn test_markdown_report_empty() {
    let markdown = generate_markdown_report(&sample_data(Completion::Completed, vec![]));
    assert!(markdown.contains("_No paths discovered._"));
}

#[test]
fn test_generate_report_dispatches_on_format() {
    let data = sample_data(Completion::Completed, default_hits());
    assert!(generate_report(&data, ReportFormat::Text).unwrap().contains("End of Report"));
    assert!(generate_report(&data, ReportFormat::Json).unwrap().starts_with('{'));
    assert!(generate_report(&data, ReportFormat::Csv).unwrap().starts_with("status_code"));
    assert!(generate_report(&data, ReportFormat::Markdown).unwrap().starts_with('#'));
}

#[test]
fn test_save_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.txt");

    save_report("hello report", &path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello report");
}
