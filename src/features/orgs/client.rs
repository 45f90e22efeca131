//! Organization endpoints. They authenticate with the id token and hand back
//! the typed transport error unchanged; callers classify it themselves.

use crate::{
    api::{ApiClient, ApiError, endpoints},
    session::SessionStore,
};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::instrument;

#[derive(Clone, Debug)]
pub struct OrganizationService {
    api: ApiClient,
    session: SessionStore,
}

impl OrganizationService {
    #[must_use]
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        Self { api, session }
    }

    /// Organizations visible to the signed-in user.
    ///
    /// # Errors
    /// Returns the [`ApiError`] of the failed request.
    #[instrument(skip_all)]
    pub async fn organizations(&self) -> Result<Value, ApiError> {
        let token = self.token();
        self.api
            .get(endpoints::ORGANIZATIONS, &[], token.as_deref())
            .await
    }

    /// # Errors
    /// Returns the [`ApiError`] of the failed request.
    #[instrument(skip(self))]
    pub async fn organization(&self, id: &str) -> Result<Value, ApiError> {
        let token = self.token();
        self.api
            .get(&organization_path(id), &[], token.as_deref())
            .await
    }

    /// # Errors
    /// Returns the [`ApiError`] of the failed request.
    #[instrument(skip(self, patch))]
    pub async fn update_organization<B: Serialize + ?Sized + Sync>(
        &self,
        id: &str,
        patch: &B,
    ) -> Result<Value, ApiError> {
        let token = self.token();
        self.api
            .patch(&organization_path(id), patch, token.as_deref())
            .await
    }

    /// # Errors
    /// Returns the [`ApiError`] of the failed request.
    #[instrument(skip(self))]
    pub async fn organization_users(&self, id: &str) -> Result<Value, ApiError> {
        let token = self.token();
        self.api
            .get(&users_path(id), &[], token.as_deref())
            .await
    }

    /// # Errors
    /// Returns the [`ApiError`] of the failed request.
    #[instrument(skip(self, user))]
    pub async fn add_organization_user<B: Serialize + ?Sized + Sync>(
        &self,
        id: &str,
        user: &B,
    ) -> Result<Value, ApiError> {
        let token = self.token();
        self.api
            .post(&users_path(id), user, token.as_deref())
            .await
    }

    /// # Errors
    /// Returns the [`ApiError`] of the failed request.
    #[instrument(skip(self))]
    pub async fn update_organization_user_role(
        &self,
        id: &str,
        user_id: &str,
        role: &str,
    ) -> Result<Value, ApiError> {
        let token = self.token();
        self.api
            .patch(
                &member_path(id, user_id),
                &json!({ "role": role }),
                token.as_deref(),
            )
            .await
    }

    /// # Errors
    /// Returns the [`ApiError`] of the failed request.
    #[instrument(skip(self))]
    pub async fn remove_organization_user(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Value, ApiError> {
        let token = self.token();
        self.api
            .delete(&member_path(id, user_id), token.as_deref())
            .await
    }

    /// Number of organizations; a non-list response counts as zero.
    ///
    /// # Errors
    /// Returns the [`ApiError`] of the failed request.
    pub async fn total_organizations(&self) -> Result<usize, ApiError> {
        let organizations = self.organizations().await?;
        Ok(organizations.as_array().map_or(0, Vec::len))
    }

    fn token(&self) -> Option<String> {
        self.session
            .id_token()
            .map(|token| token.expose_secret().to_string())
    }
}

fn organization_path(id: &str) -> String {
    format!("{}/{}", endpoints::ORGANIZATIONS, id.trim())
}

fn users_path(id: &str) -> String {
    format!("{}/users", organization_path(id))
}

fn member_path(id: &str, user_id: &str) -> String {
    format!("{}/{}", users_path(id), user_id.trim())
}
