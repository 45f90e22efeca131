use super::print_json;
use crate::app::App;
use anyhow::Result;

#[derive(Debug)]
pub enum Command {
    List,
    Show { id: String },
    Users { id: String },
}

/// Runs an organization command against the wired application.
///
/// # Errors
/// Returns the transport error when the request fails.
pub async fn execute(app: &App, command: Command) -> Result<()> {
    let organizations = &app.organizations;
    let body = match command {
        Command::List => organizations.organizations().await?,
        Command::Show { id } => organizations.organization(&id).await?,
        Command::Users { id } => organizations.organization_users(&id).await?,
    };
    print_json(&body)
}
