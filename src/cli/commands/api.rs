use crate::api::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
use clap::{Arg, Command};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TIMEOUT_MS: &str = "timeout-ms";
pub const ARG_STATE_DIR: &str = "state-dir";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Base URL of the Geminis API")
                .env("GEMINIS_API_BASE_URL")
                .default_value(DEFAULT_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT_MS)
                .long(ARG_TIMEOUT_MS)
                .help(format!("Request timeout in milliseconds (default: {DEFAULT_TIMEOUT_MS})"))
                .env("GEMINIS_API_TIMEOUT_MS")
                .value_parser(clap::value_parser!(u64).range(1..))
                .global(true),
        )
        .arg(
            Arg::new(ARG_STATE_DIR)
                .long(ARG_STATE_DIR)
                .help("Directory holding session.json and local.json (default: $HOME/.geminis)")
                .env("GEMINIS_STATE_DIR")
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .global(true),
        )
}
