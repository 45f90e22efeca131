use crate::{app::App, features::contact::ContactMessage};
use anyhow::Result;

/// Sends a contact form message.
///
/// # Errors
/// Returns the flow failure when the API rejects the message.
pub async fn execute(app: &App, message: &ContactMessage) -> Result<()> {
    let success = app.contact.send_message(message).await?;
    app.toasts.success(success.message);
    Ok(())
}
