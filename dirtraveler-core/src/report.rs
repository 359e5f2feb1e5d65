// Report generation from a finished traversal

use crate::traverse::extract_url_path;
use chrono::{DateTime, Utc};
use dirtraveler_scanner::{Hit, ScanConfig, ScanSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            other => Err(format!("Unknown report format '{}'", other)),
        }
    }
}

/// Everything a report needs: what was scanned, how, and what came back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub config: ScanConfig,
    pub summary: ScanSummary,
    pub started_at: DateTime<Utc>,
}

impl ReportData {
    pub fn new(config: ScanConfig, summary: ScanSummary, started_at: DateTime<Utc>) -> Self {
        Self {
            config,
            summary,
            started_at,
        }
    }

    /// Hits sorted by status code, then URL
    pub fn hits_by_status(&self) -> BTreeMap<u16, Vec<&Hit>> {
        let mut by_status: BTreeMap<u16, Vec<&Hit>> = BTreeMap::new();
        for hit in &self.summary.hits {
            by_status.entry(hit.status_code).or_default().push(hit);
        }
        for hits in by_status.values_mut() {
            hits.sort_by(|a, b| a.url.cmp(&b.url));
        }
        by_status
    }

    fn status_to_string(&self) -> &str {
        if self.summary.was_interrupted() {
            "Interrupted"
        } else {
            "Completed"
        }
    }
}

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
const THIN_RULE: &str = "────────────────────────────────────────────────────────────────────────────────\n";

pub fn generate_report(data: &ReportData, format: ReportFormat) -> Result<String, String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Json => generate_json_report(data).map_err(|e| e.to_string()),
        ReportFormat::Csv => Ok(generate_csv_report(data)),
        ReportFormat::Markdown => Ok(generate_markdown_report(data)),
    }
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();
    let summary = &data.summary;

    report.push_str(RULE);
    report.push_str("                        DIRTRAVELER SCAN REPORT\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("Target:       {}\n", data.config.base_url));
    report.push_str(&format!("Wordlist:     {}\n", data.config.wordlist.display()));
    report.push_str(&format!("Status:       {}\n", data.status_to_string()));
    report.push_str(&format!(
        "Scan Date:    {}\n",
        data.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push_str(&format!("Duration:     {:.1} seconds\n", summary.elapsed.as_secs_f64()));
    report.push_str(&format!(
        "Recursion:    {}\n",
        if data.config.recursive {
            format!("enabled (max depth {})", data.config.max_depth)
        } else {
            "disabled".to_string()
        }
    ));
    report.push_str(&format!("Codes:        {}\n", data.config.status_codes));
    report.push('\n');

    report.push_str(RULE);
    report.push_str("SUMMARY\n");
    report.push_str(RULE);
    report.push('\n');
    report.push_str(&format!("URLs found:           {}\n", summary.hits.len()));
    report.push_str(&format!("URLs visited:         {}\n", summary.visited_count));
    report.push_str(&format!("Unique pages:         {}\n", summary.unique_fingerprints));
    report.push_str(&format!(
        "Duplicates skipped:   {}\n",
        summary.stats.duplicates_suppressed
    ));
    report.push_str(&format!("Network errors:       {}\n", summary.stats.network_errors));
    report.push('\n');

    let by_status = data.hits_by_status();
    if !by_status.is_empty() {
        report.push_str(RULE);
        report.push_str("DISCOVERED PATHS\n");
        report.push_str(RULE);
        report.push('\n');

        for (status_code, hits) in &by_status {
            report.push_str(&format!(
                "{} ({} found)\n",
                status_label(*status_code),
                hits.len()
            ));
            report.push_str(THIN_RULE);
            for hit in hits {
                report.push_str(&format!(
                    "  {}  ({} bytes, depth {})\n",
                    hit.url, hit.content_length, hit.depth
                ));
            }
            report.push('\n');
        }
    }

    report.push_str(RULE);
    report.push_str("                          End of Report\n");
    report.push_str(RULE);
    report.push_str("\nFor authorized security testing only.\n");

    report
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    let summary = &data.summary;
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "DirTraveler",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": Utc::now().to_rfc3339(),
                "format": "json",
            },
            "scan": {
                "target": data.config.base_url,
                "wordlist": data.config.wordlist,
                "status": summary.completion,
                "start_time": data.started_at.to_rfc3339(),
                "duration_seconds": summary.elapsed.as_secs_f64(),
                "recursive": data.config.recursive,
                "max_depth": data.config.max_depth,
                "workers": data.config.workers,
                "detect_duplicates": data.config.detect_duplicates,
                "status_codes": data.config.status_codes,
            },
            "summary": {
                "total_hits": summary.hits.len(),
                "unique_fingerprints": summary.unique_fingerprints,
                "total_visited": summary.visited_count,
                "stats": summary.stats,
            },
            "hits": summary.hits,
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_csv_report(data: &ReportData) -> String {
    let mut report = String::from("status_code,url,path,depth,content_length,fingerprint\n");
    for hit in &data.summary.hits {
        report.push_str(&format!(
            "{},{},{},{},{},{}\n",
            hit.status_code,
            csv_field(&hit.url),
            csv_field(&extract_url_path(&hit.url)),
            hit.depth,
            hit.content_length,
            hit.fingerprint.as_deref().unwrap_or("")
        ));
    }
    report
}

pub fn generate_markdown_report(data: &ReportData) -> String {
    let summary = &data.summary;
    let mut report = String::new();

    report.push_str(&format!("# DirTraveler report for {}\n\n", data.config.base_url));
    report.push_str(&format!("- **Status:** {}\n", data.status_to_string()));
    report.push_str(&format!(
        "- **Started:** {}\n",
        data.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push_str(&format!("- **URLs found:** {}\n", summary.hits.len()));
    report.push_str(&format!("- **URLs visited:** {}\n", summary.visited_count));
    report.push_str(&format!("- **Unique pages:** {}\n\n", summary.unique_fingerprints));

    if summary.hits.is_empty() {
        report.push_str("_No paths discovered._\n");
        return report;
    }

    report.push_str("| Status | Path | Depth | Bytes |\n");
    report.push_str("|-------:|------|------:|------:|\n");
    for hits in data.hits_by_status().values() {
        for hit in hits {
            report.push_str(&format!(
                "| {} | [{}]({}) | {} | {} |\n",
                hit.status_code,
                extract_url_path(&hit.url).replace('|', "\\|"),
                hit.url,
                hit.depth,
                hit.content_length
            ));
        }
    }

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn status_label(status_code: u16) -> String {
    match status_code {
        200..=299 => format!("[{}] Success", status_code),
        300..=399 => format!("[{}] Redirect", status_code),
        400..=499 => format!("[{}] Client Error", status_code),
        500..=599 => format!("[{}] Server Error", status_code),
        _ => format!("[{}]", status_code),
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
