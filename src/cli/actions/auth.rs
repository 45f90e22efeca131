use super::print_json;
use crate::{
    app::App,
    features::auth::{Credentials, Registration},
};
use anyhow::Result;
use secrecy::SecretString;

#[derive(Debug)]
pub enum Command {
    Login(Credentials),
    Logout,
    Register(Registration),
    VerifyEmail { token: String },
    ResendVerification { email: String },
    ForgotPassword { email: String },
    ResetPassword {
        email: String,
        code: String,
        password: SecretString,
    },
    AcceptInvitation {
        token: String,
        password: SecretString,
    },
    Refresh,
    Status,
    Client,
}

/// Runs an authentication command against the wired application.
///
/// # Errors
/// Returns the flow failure when the API rejects the request.
pub async fn execute(app: &App, command: Command) -> Result<()> {
    let auth = &app.auth;
    match command {
        Command::Login(credentials) => {
            let success = auth.login(&credentials).await?;
            app.toasts.success(success.message);
            if let Some(user) = success.data.user {
                print_json(&user)?;
            }
        }
        Command::Logout => {
            let success = auth.logout()?;
            app.toasts.info(success.message);
        }
        Command::Register(registration) => {
            let success = auth.register(&registration).await?;
            app.toasts.success(success.message);
        }
        Command::VerifyEmail { token } => {
            let success = auth.confirm_email(&token).await?;
            app.toasts.success(success.message);
        }
        Command::ResendVerification { email } => {
            let success = auth.resend_verification(&email).await?;
            app.toasts.success(success.message);
        }
        Command::ForgotPassword { email } => {
            let success = auth.forgot_password(&email).await?;
            app.toasts.success(success.message);
        }
        Command::ResetPassword {
            email,
            code,
            password,
        } => {
            let success = auth.reset_password(&email, &code, &password).await?;
            app.toasts.success(success.message);
        }
        Command::AcceptInvitation { token, password } => {
            let success = auth.accept_invitation(&token, &password).await?;
            app.toasts.success(success.message);
        }
        Command::Refresh => {
            // A failed refresh clears the session; resync the state either way.
            let result = auth.service().refresh_token().await;
            auth.init();
            app.toasts.success(result?.message);
        }
        Command::Status => {
            if auth.is_authenticated() {
                println!("authenticated");
                if let Some(user) = auth.user() {
                    print_json(&user)?;
                }
            } else {
                println!("not authenticated");
            }
        }
        Command::Client => {
            let success = auth.client_info().await?;
            print_json(&success.data)?;
        }
    }
    Ok(())
}
