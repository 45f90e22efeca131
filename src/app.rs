//! Application wiring. Every service and store is built once here and handed
//! out as a cheap clone.
//!
//! The auth state container exists before the transport so the session-expiry
//! reaction can hold it; the transport then receives the reaction, and the auth
//! store is finally built around the same container.

use crate::{
    api::{ApiClient, ApiConfig, ApiError, SessionExpiryHandler},
    features::{
        auth::AuthService, contact::ContactService, orgs::OrganizationService,
        users::UserService,
    },
    session::{FileStorage, KeyValueStore, MemoryStorage, SessionStore},
    state::{
        AuthState, AuthStore, Observable, PageTransitionStore, ProfileStore, RouteHistory,
        SessionExpiryReaction, ToastStore,
    },
    theme::ThemeContext,
};
use std::{path::Path, sync::Arc};
use tracing::debug;

/// Per-session storage file under the state directory.
pub const SESSION_FILE: &str = "session.json";
/// Long-lived storage file: legacy token keys and the theme choice.
pub const LOCAL_FILE: &str = "local.json";

#[derive(Clone, Debug)]
pub struct App {
    pub session: SessionStore,
    pub toasts: ToastStore,
    pub history: Arc<RouteHistory>,
    pub transitions: PageTransitionStore,
    pub auth: AuthStore,
    pub users: UserService,
    pub profile: ProfileStore,
    pub organizations: OrganizationService,
    pub contact: ContactService,
    pub theme: ThemeContext,
}

impl App {
    /// Wires the application over the given stores. `local` doubles as the
    /// legacy token location and the theme preference store.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(
        config: ApiConfig,
        session_storage: Arc<dyn KeyValueStore>,
        local: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        let session = SessionStore::new(session_storage).with_legacy(local.clone());
        let toasts = ToastStore::new();
        let history = Arc::new(RouteHistory::new());
        let transitions = PageTransitionStore::new(history.clone());

        let auth_state = Observable::new(AuthState::default());
        let reaction: Arc<dyn SessionExpiryHandler> = Arc::new(SessionExpiryReaction::new(
            session.clone(),
            auth_state.clone(),
            toasts.clone(),
            transitions.clone(),
        ));

        debug!(base_url = %config.base_url, "wiring application");
        let api = ApiClient::new(config)?.with_session_expiry(reaction);

        let auth = AuthStore::with_state(AuthService::new(api.clone(), session.clone()), auth_state);
        let users = UserService::new(api.clone(), session.clone());
        let profile = ProfileStore::new(users.clone());
        let organizations = OrganizationService::new(api.clone(), session.clone());
        let contact = ContactService::new(api);
        let theme = ThemeContext::new().with_preferences(local);

        auth.init();

        Ok(Self {
            session,
            toasts,
            history,
            transitions,
            auth,
            users,
            profile,
            organizations,
            contact,
            theme,
        })
    }

    /// Wires the application over JSON files in `state_dir`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn open(config: ApiConfig, state_dir: &Path) -> Result<Self, ApiError> {
        Self::new(
            config,
            Arc::new(FileStorage::new(state_dir.join(SESSION_FILE))),
            Arc::new(FileStorage::new(state_dir.join(LOCAL_FILE))),
        )
    }

    /// Wires the application over fresh in-memory stores.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn in_memory(config: ApiConfig) -> Result<Self, ApiError> {
        Self::new(
            config,
            Arc::new(MemoryStorage::new()),
            Arc::new(MemoryStorage::new()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{App, LOCAL_FILE, SESSION_FILE};
    use crate::{
        api::ApiConfig,
        session::{FileStorage, KeyValueStore},
    };
    use anyhow::Result;

    #[test]
    fn open_restores_session_and_theme() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let session = FileStorage::new(dir.path().join(SESSION_FILE));
        session.set_item("geminis_access_token", "a")?;
        session.set_item("geminis_id_token", "b")?;
        session.set_item("geminis_user_data", r#"{"id":7}"#)?;
        FileStorage::new(dir.path().join(LOCAL_FILE)).set_item("selectedTheme", "ocean-depth")?;

        let app = App::open(ApiConfig::default(), dir.path())?;
        assert!(app.auth.is_authenticated());
        assert_eq!(app.auth.user(), Some(serde_json::json!({ "id": 7 })));
        assert_eq!(app.theme.current_theme(), "ocean-depth");
        Ok(())
    }

    #[test]
    fn in_memory_starts_signed_out() -> Result<()> {
        let app = App::in_memory(ApiConfig::default())?;
        assert!(!app.auth.is_authenticated());
        assert!(app.toasts.toasts().is_empty());
        assert_eq!(app.history.current().as_deref(), Some("/"));
        assert_eq!(app.theme.current_theme(), "default");
        Ok(())
    }
}
