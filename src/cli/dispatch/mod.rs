//! Maps validated CLI matches to an [`Action`].

use crate::{
    api::config::DEFAULT_BASE_URL,
    cli::{
        actions::{Action, auth, orgs, profile, theme},
        commands::{
            account, api, auth as auth_args, contact as contact_args, orgs as orgs_args,
            theme as theme_args,
        },
        globals::{GlobalArgs, default_state_dir},
    },
    features::{
        auth::{Credentials, Registration},
        contact::ContactMessage,
    },
};
use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};
use url::Url;

fn string(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn secret(matches: &ArgMatches, id: &str) -> Result<SecretString> {
    string(matches, id).map(SecretString::from)
}

/// Reads the global arguments. The API URL must be an absolute http(s) URL.
///
/// # Errors
/// Returns an error if the API URL does not parse or uses another scheme.
pub fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let api_url = matches
        .get_one::<String>(api::ARG_API_URL)
        .map_or(DEFAULT_BASE_URL, String::as_str);
    let parsed = Url::parse(api_url).with_context(|| format!("invalid API URL: {api_url}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("invalid API URL: {api_url} (expected http or https)");
    }

    let mut globals = GlobalArgs::new(api_url.to_string());
    if let Some(timeout_ms) = matches.get_one::<u64>(api::ARG_TIMEOUT_MS) {
        globals.timeout = Duration::from_millis(*timeout_ms);
    }
    globals.state_dir = matches
        .get_one::<PathBuf>(api::ARG_STATE_DIR)
        .cloned()
        .unwrap_or_else(default_state_dir);
    Ok(globals)
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;
    let (name, sub) = matches.subcommand().context("missing subcommand")?;

    if let Some(command) = auth_command(name, sub)? {
        return Ok(Action::Auth(globals, command));
    }

    match name {
        account::PROFILE => Ok(Action::Profile(globals, profile::Command::Show)),
        account::CHANGE_PASSWORD => Ok(Action::Profile(
            globals,
            profile::Command::ChangePassword {
                old_password: secret(sub, account::ARG_OLD_PASSWORD)?,
                new_password: secret(sub, account::ARG_NEW_PASSWORD)?,
            },
        )),
        orgs_args::ORGS => Ok(Action::Orgs(globals, orgs_command(sub)?)),
        contact_args::CONTACT => Ok(Action::Contact(
            globals,
            ContactMessage {
                name: string(sub, contact_args::ARG_NAME)?,
                email: string(sub, contact_args::ARG_EMAIL)?,
                subject: sub.get_one::<String>(contact_args::ARG_SUBJECT).cloned(),
                message: string(sub, contact_args::ARG_MESSAGE)?,
            },
        )),
        theme_args::THEME => Ok(Action::Theme(globals, theme_command(sub)?)),
        other => Err(anyhow!("unknown command: {other}")),
    }
}

fn auth_command(name: &str, sub: &ArgMatches) -> Result<Option<auth::Command>> {
    let command = match name {
        auth_args::LOGIN => auth::Command::Login(Credentials::new(
            string(sub, auth_args::ARG_EMAIL)?,
            secret(sub, auth_args::ARG_PASSWORD)?,
        )),
        auth_args::LOGOUT => auth::Command::Logout,
        auth_args::REGISTER => auth::Command::Register(Registration {
            full_name: string(sub, auth_args::ARG_NAME)?,
            email: string(sub, auth_args::ARG_EMAIL)?,
            password: secret(sub, auth_args::ARG_PASSWORD)?,
        }),
        auth_args::VERIFY_EMAIL => auth::Command::VerifyEmail {
            token: string(sub, auth_args::ARG_TOKEN)?,
        },
        auth_args::RESEND_VERIFICATION => auth::Command::ResendVerification {
            email: string(sub, auth_args::ARG_EMAIL)?,
        },
        auth_args::FORGOT_PASSWORD => auth::Command::ForgotPassword {
            email: string(sub, auth_args::ARG_EMAIL)?,
        },
        auth_args::RESET_PASSWORD => auth::Command::ResetPassword {
            email: string(sub, auth_args::ARG_EMAIL)?,
            code: string(sub, auth_args::ARG_CODE)?,
            password: secret(sub, auth_args::ARG_PASSWORD)?,
        },
        auth_args::ACCEPT_INVITATION => auth::Command::AcceptInvitation {
            token: string(sub, auth_args::ARG_TOKEN)?,
            password: secret(sub, auth_args::ARG_PASSWORD)?,
        },
        auth_args::REFRESH => auth::Command::Refresh,
        auth_args::STATUS => auth::Command::Status,
        auth_args::CLIENT => auth::Command::Client,
        _ => return Ok(None),
    };
    Ok(Some(command))
}

fn orgs_command(matches: &ArgMatches) -> Result<orgs::Command> {
    match matches.subcommand() {
        Some((orgs_args::LIST, _)) => Ok(orgs::Command::List),
        Some((orgs_args::SHOW, sub)) => Ok(orgs::Command::Show {
            id: string(sub, orgs_args::ARG_ID)?,
        }),
        Some((orgs_args::USERS, sub)) => Ok(orgs::Command::Users {
            id: string(sub, orgs_args::ARG_ID)?,
        }),
        _ => Err(anyhow!("missing orgs subcommand")),
    }
}

fn theme_command(matches: &ArgMatches) -> Result<theme::Command> {
    match matches.subcommand() {
        Some((theme_args::LIST, _)) => Ok(theme::Command::List),
        Some((theme_args::SHOW, sub)) => Ok(theme::Command::Show {
            name: sub.get_one::<String>(theme_args::ARG_NAME).cloned(),
        }),
        Some((theme_args::SET, sub)) => Ok(theme::Command::Set {
            name: string(sub, theme_args::ARG_NAME)?,
        }),
        Some((theme_args::NEXT, _)) => Ok(theme::Command::Next),
        Some((theme_args::PREVIOUS, _)) => Ok(theme::Command::Previous),
        _ => Err(anyhow!("missing theme subcommand")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    const CLEARED: [(&str, Option<&str>); 5] = [
        ("GEMINIS_API_BASE_URL", None),
        ("GEMINIS_API_TIMEOUT_MS", None),
        ("GEMINIS_STATE_DIR", None),
        ("GEMINIS_PASSWORD", None),
        ("GEMINIS_NEW_PASSWORD", None),
    ];

    fn dispatch(args: &[&str]) -> Result<Action> {
        temp_env::with_vars(CLEARED, || {
            let matches = commands::new().try_get_matches_from(args)?;
            handler(&matches)
        })
    }

    #[test]
    fn login_builds_credentials() -> Result<()> {
        let action = dispatch(&[
            "geminis",
            "--state-dir",
            "/tmp/geminis-test",
            "--timeout-ms",
            "1500",
            "login",
            "--email",
            "ana@example.com",
            "--password",
            "pw",
        ])?;
        assert_eq!(action.globals().state_dir, PathBuf::from("/tmp/geminis-test"));
        assert_eq!(action.globals().timeout, Duration::from_millis(1500));
        let Action::Auth(_, auth::Command::Login(credentials)) = action else {
            bail!("expected login action");
        };
        assert_eq!(credentials.email, "ana@example.com");
        assert_eq!(credentials.password.expose_secret(), "pw");
        Ok(())
    }

    #[test]
    fn invalid_api_url_rejected() {
        assert!(dispatch(&["geminis", "--api-url", "not a url", "status"]).is_err());
        assert!(dispatch(&["geminis", "--api-url", "ftp://files.example.com", "status"]).is_err());
    }

    #[test]
    fn contact_subject_is_optional() -> Result<()> {
        let action = dispatch(&[
            "geminis",
            "contact",
            "--name",
            "Ana",
            "--email",
            "ana@example.com",
            "Hola",
        ])?;
        let Action::Contact(_, message) = action else {
            bail!("expected contact action");
        };
        assert_eq!(message.subject, None);
        assert_eq!(message.message, "Hola");
        Ok(())
    }

    #[test]
    fn nested_commands_dispatch() -> Result<()> {
        let action = dispatch(&["geminis", "orgs", "show", "7"])?;
        assert!(matches!(
            action,
            Action::Orgs(_, orgs::Command::Show { ref id }) if id == "7"
        ));

        let action = dispatch(&["geminis", "theme", "show"])?;
        assert!(matches!(action, Action::Theme(_, theme::Command::Show { name: None })));
        Ok(())
    }

    #[test]
    fn change_password_reads_both_secrets() -> Result<()> {
        let action = dispatch(&[
            "geminis",
            "change-password",
            "--old-password",
            "old",
            "--new-password",
            "new",
        ])?;
        let Action::Profile(
            _,
            profile::Command::ChangePassword {
                old_password,
                new_password,
            },
        ) = action
        else {
            bail!("expected change-password action");
        };
        assert_eq!(old_password.expose_secret(), "old");
        assert_eq!(new_password.expose_secret(), "new");
        Ok(())
    }
}
