pub mod auth;
pub mod contact;
pub mod orgs;
pub mod profile;
pub mod theme;

// Internal "interpreter" for `Action`.
mod run;

use crate::{cli::globals::GlobalArgs, features::contact::ContactMessage};
use serde_json::Value;

#[derive(Debug)]
pub enum Action {
    Auth(GlobalArgs, auth::Command),
    Profile(GlobalArgs, profile::Command),
    Orgs(GlobalArgs, orgs::Command),
    Contact(GlobalArgs, ContactMessage),
    Theme(GlobalArgs, theme::Command),
}

impl Action {
    #[must_use]
    pub fn globals(&self) -> &GlobalArgs {
        match self {
            Action::Auth(globals, _)
            | Action::Profile(globals, _)
            | Action::Orgs(globals, _)
            | Action::Contact(globals, _)
            | Action::Theme(globals, _) => globals,
        }
    }

    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

/// Prints a response body; `null` prints nothing.
pub(crate) fn print_json(value: &Value) -> anyhow::Result<()> {
    if !value.is_null() {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}
