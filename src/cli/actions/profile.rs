use crate::{app::App, features::users::UserProfile};
use anyhow::Result;
use secrecy::SecretString;

#[derive(Debug)]
pub enum Command {
    Show,
    ChangePassword {
        old_password: SecretString,
        new_password: SecretString,
    },
}

fn describe(user: &UserProfile) -> String {
    let name = user.name.as_deref().unwrap_or("-");
    let email = user.email.as_deref().unwrap_or("-");
    format!("{name} <{email}> ({})", user.role_label())
}

/// Runs a profile command against the wired application.
///
/// # Errors
/// Returns the flow failure when the API rejects the request.
pub async fn execute(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Show => {
            let profile = app.profile.load_profile_data().await?.data;
            println!("{}", describe(&profile.user));
            if let Some(last_login) = &profile.user.last_login_at {
                println!("last login: {last_login}");
            }
            for user in &profile.users {
                println!("  {}", describe(user));
            }
        }
        Command::ChangePassword {
            old_password,
            new_password,
        } => {
            let success = app
                .profile
                .change_password(&old_password, &new_password)
                .await?;
            app.toasts.success(success.message);
        }
    }
    Ok(())
}
