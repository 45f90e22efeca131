use clap::{Arg, Command};

pub const ORGS: &str = "orgs";
pub const LIST: &str = "list";
pub const SHOW: &str = "show";
pub const USERS: &str = "users";

pub const ARG_ID: &str = "id";

fn id_arg() -> Arg {
    Arg::new(ARG_ID).help("Organization id").required(true)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.subcommand(
        Command::new(ORGS)
            .about("Organizations visible to the signed-in user")
            .subcommand_required(true)
            .subcommand(Command::new(LIST).about("List organizations"))
            .subcommand(Command::new(SHOW).about("Show one organization").arg(id_arg()))
            .subcommand(
                Command::new(USERS)
                    .about("List the members of an organization")
                    .arg(id_arg()),
            ),
    )
}
