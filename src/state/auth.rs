//! Authentication state shared by every view. The store hydrates from the
//! session once on `init` and afterwards mirrors the outcome of each auth flow.

use crate::{
    features::{
        FlowResult,
        auth::{AuthService, Credentials, Registration},
    },
    session::Session,
    state::{Observable, merge_object},
};
use secrecy::SecretString;
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<Value>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AuthStore {
    service: AuthService,
    state: Observable<AuthState>,
}

impl AuthStore {
    #[must_use]
    pub fn new(service: AuthService) -> Self {
        Self::with_state(service, Observable::default())
    }

    /// Builds the store around an existing state container, so the container can
    /// be handed to collaborators created before the store.
    #[must_use]
    pub fn with_state(service: AuthService, state: Observable<AuthState>) -> Self {
        Self { service, state }
    }

    #[must_use]
    pub fn state(&self) -> &Observable<AuthState> {
        &self.state
    }

    #[must_use]
    pub fn service(&self) -> &AuthService {
        &self.service
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.with(|state| state.is_authenticated)
    }

    #[must_use]
    pub fn user(&self) -> Option<Value> {
        self.state.with(|state| state.user.clone())
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.state.with(|state| state.loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.with(|state| state.error.clone())
    }

    /// Hydrates the state from the stored session.
    pub fn init(&self) {
        self.state.update(|state| state.loading = true);
        let is_authenticated = self.service.is_authenticated();
        let user = self.service.user_data();
        debug!(is_authenticated, "auth state initialized");
        self.state.update(|state| {
            state.is_authenticated = is_authenticated;
            state.user = user;
            state.loading = false;
            state.error = None;
        });
    }

    pub async fn register(&self, registration: &Registration) -> FlowResult<Value> {
        self.begin();
        let result = self.service.register(registration).await;
        self.finish(&result);
        result
    }

    pub async fn confirm_email(&self, token: &str) -> FlowResult<Value> {
        self.begin();
        let result = self.service.confirm_email(token).await;
        self.finish(&result);
        result
    }

    pub async fn accept_invitation(&self, token: &str, password: &SecretString) -> FlowResult<Value> {
        self.begin();
        let result = self.service.accept_invitation(token, password).await;
        self.finish(&result);
        result
    }

    pub async fn login(&self, credentials: &Credentials) -> FlowResult<Session> {
        self.begin();
        let result = self.service.login(credentials).await;
        match &result {
            Ok(success) => {
                let user = success
                    .data
                    .user
                    .clone()
                    .or_else(|| self.service.user_data());
                self.state.update(|state| {
                    state.is_authenticated = true;
                    state.user = user;
                    state.loading = false;
                    state.error = None;
                });
            }
            Err(failure) => self.state.update(|state| {
                state.is_authenticated = false;
                state.user = None;
                state.loading = false;
                state.error = Some(failure.message.clone());
            }),
        }
        result
    }

    /// Clears the session and resets the state. Always succeeds.
    pub fn logout(&self) -> FlowResult<()> {
        self.state.update(|state| state.loading = true);
        let result = self.service.logout();
        self.state.set(AuthState::default());
        result
    }

    pub fn clear_error(&self) {
        self.state.update(|state| state.error = None);
    }

    /// Fetches the current client and nests it under `user.client`.
    pub async fn client_info(&self) -> FlowResult<Value> {
        self.begin();
        let result = self.service.current_client().await;
        match &result {
            Ok(success) => {
                let client = success.data.clone();
                self.state.update(|state| {
                    let mut patch = Map::new();
                    patch.insert("client".to_string(), client);
                    state.user = Some(merge_object(state.user.take(), patch));
                    state.loading = false;
                    state.error = None;
                });
            }
            Err(_) => self.finish(&result),
        }
        result
    }

    pub async fn resend_verification(&self, email: &str) -> FlowResult<Value> {
        self.begin();
        let result = self.service.resend_verification(email).await;
        self.finish(&result);
        result
    }

    pub async fn forgot_password(&self, email: &str) -> FlowResult<Value> {
        self.begin();
        let result = self.service.forgot_password(email).await;
        self.finish(&result);
        result
    }

    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &SecretString,
    ) -> FlowResult<Value> {
        self.begin();
        let result = self.service.reset_password(email, code, new_password).await;
        self.finish(&result);
        result
    }

    /// Shallow-merges `patch` into the cached user.
    pub fn update_user(&self, patch: Map<String, Value>) {
        self.state
            .update(|state| state.user = Some(merge_object(state.user.take(), patch)));
    }

    fn begin(&self) {
        self.state.update(|state| {
            state.loading = true;
            state.error = None;
        });
    }

    fn finish<T>(&self, result: &FlowResult<T>) {
        let error = result.as_ref().err().map(|failure| failure.message.clone());
        self.state.update(|state| {
            state.loading = false;
            state.error = error;
        });
    }
}

/// Resets the state after a forced logout without touching the network.
pub(crate) fn reset(state: &Observable<AuthState>) {
    state.set(AuthState::default());
}
