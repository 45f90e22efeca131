use super::{password_arg, validator_email};
use clap::{Arg, Command};

pub const LOGIN: &str = "login";
pub const LOGOUT: &str = "logout";
pub const REGISTER: &str = "register";
pub const VERIFY_EMAIL: &str = "verify-email";
pub const RESEND_VERIFICATION: &str = "resend-verification";
pub const FORGOT_PASSWORD: &str = "forgot-password";
pub const RESET_PASSWORD: &str = "reset-password";
pub const ACCEPT_INVITATION: &str = "accept-invitation";
pub const REFRESH: &str = "refresh";
pub const STATUS: &str = "status";
pub const CLIENT: &str = "client";

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_NAME: &str = "name";
pub const ARG_TOKEN: &str = "token";
pub const ARG_CODE: &str = "code";

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long(ARG_EMAIL)
        .help("Account email")
        .required(true)
        .value_parser(validator_email())
}

fn token_arg(help: &'static str) -> Arg {
    Arg::new(ARG_TOKEN).help(help).required(true)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .subcommand(
            Command::new(LOGIN)
                .about("Sign in and store the session")
                .arg(email_arg())
                .arg(password_arg(ARG_PASSWORD, "GEMINIS_PASSWORD", "Account password")),
        )
        .subcommand(Command::new(LOGOUT).about("Forget the stored session"))
        .subcommand(
            Command::new(REGISTER)
                .about("Create a client account")
                .arg(
                    Arg::new(ARG_NAME)
                        .short('n')
                        .long(ARG_NAME)
                        .help("Full name")
                        .required(true),
                )
                .arg(email_arg())
                .arg(password_arg(ARG_PASSWORD, "GEMINIS_PASSWORD", "Account password")),
        )
        .subcommand(
            Command::new(VERIFY_EMAIL)
                .about("Confirm an email address with the emailed token")
                .arg(token_arg("Verification token")),
        )
        .subcommand(
            Command::new(RESEND_VERIFICATION)
                .about("Send the verification email again")
                .arg(email_arg()),
        )
        .subcommand(
            Command::new(FORGOT_PASSWORD)
                .about("Request a password reset code")
                .arg(email_arg()),
        )
        .subcommand(
            Command::new(RESET_PASSWORD)
                .about("Set a new password with the emailed code")
                .arg(email_arg())
                .arg(
                    Arg::new(ARG_CODE)
                        .short('c')
                        .long(ARG_CODE)
                        .help("Reset code")
                        .required(true),
                )
                .arg(password_arg(ARG_PASSWORD, "GEMINIS_PASSWORD", "New password")),
        )
        .subcommand(
            Command::new(ACCEPT_INVITATION)
                .about("Accept an invitation and choose a password")
                .arg(token_arg("Invitation token"))
                .arg(password_arg(ARG_PASSWORD, "GEMINIS_PASSWORD", "Account password")),
        )
        .subcommand(Command::new(REFRESH).about("Exchange the refresh token for a new session"))
        .subcommand(Command::new(STATUS).about("Show whether a session is stored"))
        .subcommand(Command::new(CLIENT).about("Show the client of the signed-in account"))
}
