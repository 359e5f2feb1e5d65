use dirtraveler::commands::command_argument_builder;
use dirtraveler::handlers::*;
use dirtraveler_scanner::{Completion, RunStats, ScanSummary, StatusCodes};
use std::path::PathBuf;
use std::time::Duration;

fn summary(completion: Completion) -> ScanSummary {
    ScanSummary {
        completion,
        unique_fingerprints: 3,
        visited_count: 41,
        elapsed: Duration::from_secs(2),
        stats: RunStats::default(),
        hits: vec![],
    }
}

fn matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["dirtraveler"];
    argv.extend_from_slice(args);
    command_argument_builder()
        .try_get_matches_from(argv)
        .unwrap()
}

#[test]
fn test_parse_status_codes_separate_values() {
    let codes = parse_status_codes(&["200".to_string(), "301".to_string(), "302".to_string()])
        .unwrap();
    assert_eq!(codes, StatusCodes::new([200, 301, 302]));
}

#[test]
fn test_parse_status_codes_single_list() {
    let codes = parse_status_codes(&["200,403".to_string()]).unwrap();
    assert_eq!(codes, StatusCodes::new([200, 403]));

    let codes = parse_status_codes(&["200-204".to_string()]).unwrap();
    assert_eq!(codes.len(), 5);
}

#[test]
fn test_parse_status_codes_invalid() {
    let err = parse_status_codes(&["ok".to_string()]).unwrap_err();
    assert!(err.contains("Invalid status code list"));
    assert!(parse_status_codes(&["700".to_string()]).is_err());
}

#[test]
fn test_expand_wordlist_path_plain() {
    assert_eq!(
        expand_wordlist_path("/usr/share/wordlists/common.txt"),
        PathBuf::from("/usr/share/wordlists/common.txt")
    );
}

#[test]
fn test_expand_wordlist_path_tilde() {
    let expanded = expand_wordlist_path("~/words.txt");
    assert!(expanded.ends_with("words.txt"));
    if let Ok(home) = std::env::var("HOME") {
        assert_eq!(expanded, PathBuf::from(home).join("words.txt"));
    }
}

#[test]
fn test_log_level() {
    assert_eq!(log_level(0), "warn");
    assert_eq!(log_level(1), "info");
    assert_eq!(log_level(2), "debug");
    assert_eq!(log_level(5), "debug");
}

#[test]
fn test_exit_code() {
    assert_eq!(exit_code(&summary(Completion::Completed)), 0);
    assert_eq!(exit_code(&summary(Completion::Interrupted)), EXIT_INTERRUPTED);
}

#[test]
fn test_format_summary() {
    assert_eq!(
        format_summary(&summary(Completion::Completed)),
        "Scan complete! Found 3 URLs (41 visited in total)"
    );
    assert_eq!(
        format_summary(&summary(Completion::Interrupted)),
        "Scan interrupted... Found 3 URLs (41 visited in total)"
    );
}

#[test]
fn test_build_scan_config_defaults() {
    let m = matches(&["-u", "http://ex.test", "-w", "/tmp/words.txt"]);
    let config = build_scan_config(&m).unwrap();

    assert_eq!(config.base_url, "http://ex.test/");
    assert_eq!(config.wordlist, PathBuf::from("/tmp/words.txt"));
    assert!(!config.recursive);
    assert_eq!(config.max_depth, 3);
    assert_eq!(config.workers, 10);
    assert!(config.detect_duplicates);
    assert!(!config.follow_redirects);
    assert_eq!(config.request_timeout, Duration::from_secs(5));
    assert_eq!(config.status_codes, StatusCodes::default());
}

#[test]
fn test_build_scan_config_all_flags() {
    let m = matches(&[
        "-u",
        "https://ex.test/app",
        "-w",
        "/tmp/words.txt",
        "-r",
        "-c",
        "200",
        "403",
        "-d",
        "1",
        "-t",
        "4",
        "--no-detect-duplicates",
        "--timeout",
        "2",
        "--follow-redirects",
    ]);
    let config = build_scan_config(&m).unwrap();

    assert!(config.recursive);
    assert_eq!(config.status_codes, StatusCodes::new([200, 403]));
    assert_eq!(config.max_depth, 1);
    assert_eq!(config.workers, 4);
    assert!(!config.detect_duplicates);
    assert!(config.follow_redirects);
    assert_eq!(config.request_timeout, Duration::from_secs(2));
}

#[test]
fn test_duplicate_detection_flags() {
    let base = ["-u", "http://ex.test", "-w", "words.txt"];

    assert!(duplicate_detection(&matches(&base)));

    let mut explicit = base.to_vec();
    explicit.push("--detect-duplicates");
    assert!(duplicate_detection(&matches(&explicit)));
    assert!(build_scan_config(&matches(&explicit)).unwrap().detect_duplicates);

    let mut disabled = base.to_vec();
    disabled.push("--no-detect-duplicates");
    assert!(!duplicate_detection(&matches(&disabled)));
}

#[test]
fn test_build_scan_config_rejects_zero_threads() {
    let m = matches(&["-u", "http://ex.test", "-w", "words.txt", "-t", "0"]);
    let err = build_scan_config(&m).unwrap_err();
    assert!(err.contains("worker count"));
}

#[test]
fn test_build_scan_config_rejects_bad_codes() {
    let m = matches(&["-u", "http://ex.test", "-w", "words.txt", "-c", "abc"]);
    assert!(build_scan_config(&m).is_err());
}

#[test]
fn test_command_requires_url_and_wordlist() {
    assert!(
        command_argument_builder()
            .try_get_matches_from(["dirtraveler", "-w", "words.txt"])
            .is_err()
    );
    assert!(
        command_argument_builder()
            .try_get_matches_from(["dirtraveler", "-u", "http://ex.test"])
            .is_err()
    );
}

#[test]
fn test_command_duplicate_flags_conflict() {
    let result = command_argument_builder().try_get_matches_from([
        "dirtraveler",
        "-u",
        "http://ex.test",
        "-w",
        "words.txt",
        "--detect-duplicates",
        "--no-detect-duplicates",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_command_verbose_counts() {
    let m = matches(&["-u", "http://ex.test", "-w", "words.txt", "-vv"]);
    assert_eq!(m.get_count("verbose"), 2);
}

#[test]
fn test_command_rejects_unknown_format() {
    let result = command_argument_builder().try_get_matches_from([
        "dirtraveler",
        "-u",
        "http://ex.test",
        "-w",
        "words.txt",
        "-f",
        "html",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_command_builder_is_valid() {
    command_argument_builder().debug_assert();
}
