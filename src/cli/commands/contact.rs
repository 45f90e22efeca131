use super::validator_email;
use clap::{Arg, Command};

pub const CONTACT: &str = "contact";

pub const ARG_NAME: &str = "name";
pub const ARG_EMAIL: &str = "email";
pub const ARG_SUBJECT: &str = "subject";
pub const ARG_MESSAGE: &str = "message";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.subcommand(
        Command::new(CONTACT)
            .about("Send a message through the public contact form")
            .arg(
                Arg::new(ARG_NAME)
                    .short('n')
                    .long(ARG_NAME)
                    .help("Sender name")
                    .required(true),
            )
            .arg(
                Arg::new(ARG_EMAIL)
                    .short('e')
                    .long(ARG_EMAIL)
                    .help("Reply-to email")
                    .required(true)
                    .value_parser(validator_email()),
            )
            .arg(
                Arg::new(ARG_SUBJECT)
                    .short('s')
                    .long(ARG_SUBJECT)
                    .help("Subject line"),
            )
            .arg(Arg::new(ARG_MESSAGE).help("Message body").required(true)),
    )
}
