use super::password_arg;
use clap::Command;

pub const PROFILE: &str = "profile";
pub const CHANGE_PASSWORD: &str = "change-password";

pub const ARG_OLD_PASSWORD: &str = "old-password";
pub const ARG_NEW_PASSWORD: &str = "new-password";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .subcommand(
            Command::new(PROFILE).about("Show the signed-in user and, for master accounts, its linked users"),
        )
        .subcommand(
            Command::new(CHANGE_PASSWORD)
                .about("Change the password of the signed-in user")
                .arg(password_arg(ARG_OLD_PASSWORD, "GEMINIS_PASSWORD", "Current password"))
                .arg(password_arg(ARG_NEW_PASSWORD, "GEMINIS_NEW_PASSWORD", "New password")),
        )
}
