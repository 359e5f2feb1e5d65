pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    build_scan_config, duplicate_detection, exit_code, expand_wordlist_path, format_summary,
    handle_scan, log_level, parse_status_codes,
};
