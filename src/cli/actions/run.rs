use super::{Action, auth, contact, orgs, profile, theme};
use crate::app::App;
use anyhow::Result;
use tracing::debug;

pub(super) async fn execute(action: Action) -> Result<()> {
    let globals = action.globals();
    debug!(state_dir = %globals.state_dir.display(), "opening application state");
    let app = globals.app()?;

    let result = match action {
        Action::Auth(_, command) => auth::execute(&app, command).await,
        Action::Profile(_, command) => profile::execute(&app, command).await,
        Action::Orgs(_, command) => orgs::execute(&app, command).await,
        Action::Contact(_, message) => contact::execute(&app, &message).await,
        Action::Theme(_, command) => theme::execute(&app, &command),
    };

    report_toasts(&app);
    result
}

/// Pending toasts go to stderr before the process exits.
fn report_toasts(app: &App) {
    for toast in app.toasts.drain() {
        eprintln!("[{}] {}", toast.kind, toast.message);
    }
}
