pub mod account;
pub mod api;
pub mod auth;
pub mod contact;
pub mod logging;
pub mod orgs;
pub mod theme;

use clap::{
    Arg, ColorChoice, Command,
    builder::{
        ValueParser,
        styling::{AnsiColor, Effects, Styles},
    },
};
use regex::Regex;

/// Trims and lowercases an email, rejecting anything that is not `local@domain.tld`.
#[must_use]
pub fn validator_email() -> ValueParser {
    ValueParser::from(move |email: &str| -> std::result::Result<String, String> {
        let normalized = email.trim().to_lowercase();
        if Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(&normalized))
        {
            Ok(normalized)
        } else {
            Err("invalid email address".to_string())
        }
    })
}

/// Required secret argument that may also come from `env`; its value is never
/// shown in help output.
pub(crate) fn password_arg(id: &'static str, env: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .help(help)
        .env(env)
        .hide_env_values(true)
        .required(true)
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("geminis")
        .about("Geminis Labs API client")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true);

    let command = api::with_args(command);
    let command = auth::with_args(command);
    let command = account::with_args(command);
    let command = orgs::with_args(command);
    let command = contact::with_args(command);
    let command = theme::with_args(command);
    logging::with_args(command)
}
