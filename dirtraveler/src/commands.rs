use clap::arg;
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("dirtraveler")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("dirtraveler")
        .about("Recursive web directory enumeration")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-u --"url" <URL>)
                .required(true)
                .help("URL to perform directory enumeration against")
                .value_parser(clap::value_parser!(Url)),
        )
        .arg(
            arg!(-w --"wordlist" <PATH>)
                .required(true)
                .help("Wordlist to use for enumeration (accepts ~)"),
        )
        .arg(
            arg!(-r --"recursive")
                .required(false)
                .help("Enable recursive enumeration into discovered paths")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-c --"codes" <CODES>)
                .required(false)
                .help(
                    "Status codes to treat as a positive response, e.g. '200 301 302', \
                '200,403' or '200-299'",
                )
                .num_args(1..)
                .default_value("200-399"),
        )
        .arg(
            arg!(-d --"depth" <DEPTH>)
                .required(false)
                .help("Maximum recursive depth, anything beyond 1 is resource intensive")
                .value_parser(clap::value_parser!(usize))
                .default_value("3"),
        )
        .arg(
            arg!(-t --"threads" <NUM_WORKERS>)
                .required(false)
                .help("The number of async workers in the worker pool")
                .value_parser(clap::value_parser!(usize))
                .default_value("10"),
        )
        .arg(
            arg!(--"detect-duplicates")
                .required(false)
                .help("Suppress pages whose body matches an earlier hit (default)")
                .action(clap::ArgAction::SetTrue)
                .conflicts_with("no-detect-duplicates"),
        )
        .arg(
            arg!(--"no-detect-duplicates")
                .required(false)
                .help("Disable duplicate content detection (not recommended)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("5"),
        )
        .arg(
            arg!(--"follow-redirects")
                .required(false)
                .help("Follow redirects instead of reporting 3xx responses")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Save report to file")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: text, json, csv, markdown")
                .value_parser(["text", "json", "csv", "markdown"])
                .default_value("text"),
        )
        .arg(arg!(-q --"quiet" "Suppress banner and progress output").required(false))
        .arg(
            arg!(-v --"verbose" ...)
                .required(false)
                .help("Increase log verbosity (-v info, -vv debug)"),
        )
}
