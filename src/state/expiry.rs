//! Reaction to a 401 from the API: forced logout, warning toast, redirect to the
//! sign-in page. The transport only sees it as a [`SessionExpiryHandler`].

use crate::{
    api::SessionExpiryHandler,
    session::SessionStore,
    state::{
        AuthState, Observable, PageTransitionStore, ToastStore,
        auth,
        transition::{GotoOptions, TransitionKind},
    },
};
use async_trait::async_trait;
use tracing::info;

pub const SESSION_EXPIRED_MESSAGE: &str =
    "Tu sesión ha expirado. Por favor, inicia sesión nuevamente.";
pub const SIGN_IN_ROUTE: &str = "/auth";

#[derive(Clone, Debug)]
pub struct SessionExpiryReaction {
    session: SessionStore,
    auth: Observable<AuthState>,
    toasts: ToastStore,
    transitions: PageTransitionStore,
}

impl SessionExpiryReaction {
    #[must_use]
    pub fn new(
        session: SessionStore,
        auth: Observable<AuthState>,
        toasts: ToastStore,
        transitions: PageTransitionStore,
    ) -> Self {
        Self {
            session,
            auth,
            toasts,
            transitions,
        }
    }
}

#[async_trait]
impl SessionExpiryHandler for SessionExpiryReaction {
    async fn session_expired(&self) {
        info!("session expired, signing out");
        self.session.clear();
        auth::reset(&self.auth);
        self.toasts.warning(SESSION_EXPIRED_MESSAGE);
        self.transitions
            .goto(
                SIGN_IN_ROUTE,
                GotoOptions {
                    transition: TransitionKind::Fade,
                    replace_state: true,
                    ..GotoOptions::default()
                },
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::SessionExpiryReaction;
    use crate::{
        api::SessionExpiryHandler,
        session::{KeyValueStore, MemoryStorage, SessionStore},
        state::{AuthState, Observable, PageTransitionStore, RouteHistory, ToastKind, ToastStore},
    };
    use anyhow::Result;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn expiry_logs_out_warns_and_redirects() -> Result<()> {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item("geminis_access_token", "a")?;
        storage.set_item("geminis_id_token", "b")?;

        let auth = Observable::new(AuthState {
            is_authenticated: true,
            ..AuthState::default()
        });
        let toasts = ToastStore::new();
        let history = Arc::new(RouteHistory::new());
        let reaction = SessionExpiryReaction::new(
            SessionStore::new(storage.clone()),
            auth.clone(),
            toasts.clone(),
            PageTransitionStore::new(history.clone()),
        );

        reaction.session_expired().await;

        assert_eq!(storage.get_item("geminis_access_token"), None);
        assert_eq!(auth.get(), AuthState::default());
        let pending = toasts.toasts();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].kind, ToastKind::Warning);
        assert_eq!(
            pending[0].message,
            "Tu sesión ha expirado. Por favor, inicia sesión nuevamente."
        );
        assert_eq!(history.entries(), vec!["/auth".to_string()]);
        Ok(())
    }
}
