use dirtraveler::commands::command_argument_builder;
use dirtraveler::handlers::{handle_scan, log_level};
use dirtraveler_core::print_banner;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbosity: u8) {
    // RUST_LOG wins over -v when set
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level(verbosity)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = command_argument_builder().get_matches();
    let quiet = matches.get_flag("quiet");

    init_tracing(matches.get_count("verbose"));

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let code = handle_scan(&matches).await.map_err(anyhow::Error::msg)?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
