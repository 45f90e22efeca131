//! Profile endpoints of the signed-in user. Every call needs the stored access
//! token and fails locally, without a request, when there is none.

use crate::{
    api::{ApiClient, endpoints},
    features::{
        auth::client::NO_ACCESS_TOKEN,
        outcome::{FlowError, FlowResult, FlowSuccess, decode, user_failure},
        users::types::{ChangePasswordRequest, UserProfile},
    },
    session::{SessionStore, is_valid_token},
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

const PASSWORD_CHANGED: &str = "Contraseña actualizada correctamente";

#[derive(Clone, Debug)]
pub struct UserService {
    api: ApiClient,
    session: SessionStore,
}

impl UserService {
    #[must_use]
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        Self { api, session }
    }

    #[instrument(skip_all)]
    pub async fn current_user(&self) -> FlowResult<UserProfile> {
        let result = self.fetch(endpoints::GET_USER_ME).await;
        settle(result, "", "Error al obtener información del usuario")
    }

    /// Users linked to the signed-in master account. Entries that do not
    /// decode are skipped.
    #[instrument(skip_all)]
    pub async fn users(&self) -> FlowResult<Vec<UserProfile>> {
        let result = self
            .fetch::<Vec<Value>>(endpoints::GET_USERS)
            .await
            .map(|entries| {
                let users: Vec<UserProfile> = entries
                    .into_iter()
                    .filter_map(|entry| {
                        serde_json::from_value(entry)
                            .map_err(|err| warn!("skipping malformed user entry: {err}"))
                            .ok()
                    })
                    .collect();
                debug!(count = users.len(), "associated users fetched");
                users
            });
        settle(result, "", "Error al obtener usuarios asociados")
    }

    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        old_password: &SecretString,
        new_password: &SecretString,
    ) -> FlowResult<Value> {
        let request = ChangePasswordRequest {
            old_password,
            new_password,
        };
        let result = self.send_patch(endpoints::CHANGE_PASSWORD, &request).await;
        settle(result, PASSWORD_CHANGED, "Error al cambiar la contraseña")
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, FlowError> {
        let token = self.access_token()?;
        let data = self
            .api
            .get(endpoint, &[], Some(token.expose_secret()))
            .await?;
        decode(data)
    }

    async fn send_patch(
        &self,
        endpoint: &str,
        body: &ChangePasswordRequest<'_>,
    ) -> Result<Value, FlowError> {
        let token = self.access_token()?;
        Ok(self
            .api
            .patch(endpoint, body, Some(token.expose_secret()))
            .await?)
    }

    fn access_token(&self) -> Result<SecretString, FlowError> {
        self.session
            .access_token()
            .filter(|token| is_valid_token(token.expose_secret()))
            .ok_or_else(|| FlowError::Local(NO_ACCESS_TOKEN.to_string()))
    }
}

fn settle<T>(result: Result<T, FlowError>, success: &str, default_message: &str) -> FlowResult<T> {
    result
        .map(|data| FlowSuccess::new(success, data))
        .map_err(|err| user_failure(err, default_message))
}
