use clap::{Arg, Command};

pub const THEME: &str = "theme";
pub const LIST: &str = "list";
pub const SHOW: &str = "show";
pub const SET: &str = "set";
pub const NEXT: &str = "next";
pub const PREVIOUS: &str = "previous";

pub const ARG_NAME: &str = "name";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.subcommand(
        Command::new(THEME)
            .about("Color themes")
            .subcommand_required(true)
            .subcommand(Command::new(LIST).about("List the available themes"))
            .subcommand(
                Command::new(SHOW)
                    .about("Show a theme palette (default: the active theme)")
                    .arg(Arg::new(ARG_NAME).help("Theme slug")),
            )
            .subcommand(
                Command::new(SET)
                    .about("Activate a theme")
                    .arg(Arg::new(ARG_NAME).help("Theme slug").required(true)),
            )
            .subcommand(Command::new(NEXT).about("Activate the following theme"))
            .subcommand(Command::new(PREVIOUS).about("Activate the preceding theme")),
    )
}
