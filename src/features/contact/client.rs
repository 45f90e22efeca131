//! Public contact form. No session is required.

use crate::{
    api::{ApiClient, endpoints},
    features::outcome::{FlowError, FlowResult, FlowSuccess, auth_failure},
};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

const MESSAGE_SENT: &str = "Mensaje enviado correctamente";

#[derive(Clone, Debug, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct ContactService {
    api: ApiClient,
}

impl ContactService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip_all)]
    pub async fn send_message(&self, message: &ContactMessage) -> FlowResult<Value> {
        self.api
            .post(endpoints::SEND_CONTACT_MESSAGE, message, None)
            .await
            .map(|data| FlowSuccess::new(MESSAGE_SENT, data))
            .map_err(|err| auth_failure(FlowError::from(err), "Error al enviar el mensaje"))
    }
}
