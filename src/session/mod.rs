//! Session persistence: the access/id token pair, an optional refresh token and
//! the cached user profile. The authenticated flag is derived from storage on
//! every call, so a corrupt entry is detected and purged as soon as anyone asks.
//!
//! Without an attached session storage the store behaves like a page rendered
//! outside the browser: reads return `None` and writes do nothing.

pub mod storage;

pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError};

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::{fmt, sync::Arc};
use tracing::{debug, warn};

/// Shared prefix of every session key.
pub const STORAGE_PREFIX: &str = "geminis_";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionKey {
    AccessToken,
    IdToken,
    RefreshToken,
    UserData,
}

impl SessionKey {
    pub const ALL: [SessionKey; 4] = [
        SessionKey::AccessToken,
        SessionKey::IdToken,
        SessionKey::RefreshToken,
        SessionKey::UserData,
    ];

    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            SessionKey::AccessToken => "geminis_access_token",
            SessionKey::IdToken => "geminis_id_token",
            SessionKey::RefreshToken => "geminis_refresh_token",
            SessionKey::UserData => "geminis_user_data",
        }
    }
}

/// Credentials issued by the API. Tokens are opaque and never printed.
#[derive(Clone)]
pub struct Session {
    pub access_token: SecretString,
    pub id_token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub user: Option<Value>,
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("id_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    /// Builds a session from raw token values, or `None` when either required
    /// token is missing, empty or the literal `"null"`.
    #[must_use]
    pub fn from_tokens(
        access_token: Option<&str>,
        id_token: Option<&str>,
        refresh_token: Option<&str>,
        user: Option<Value>,
    ) -> Option<Self> {
        let access_token = access_token.filter(|token| is_valid_token(token))?;
        let id_token = id_token.filter(|token| is_valid_token(token))?;
        Some(Self {
            access_token: SecretString::from(access_token.to_string()),
            id_token: SecretString::from(id_token.to_string()),
            refresh_token: refresh_token
                .filter(|token| !token.is_empty())
                .map(|token| SecretString::from(token.to_string())),
            user: user.filter(|user| !user.is_null()),
        })
    }
}

/// A token counts as present when it is non-blank and not the string `"null"`.
#[must_use]
pub fn is_valid_token(token: &str) -> bool {
    let trimmed = token.trim();
    !trimmed.is_empty() && trimmed != "null"
}

#[derive(Clone, Default)]
pub struct SessionStore {
    session: Option<Arc<dyn KeyValueStore>>,
    legacy: Option<Arc<dyn KeyValueStore>>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SessionStore")
            .field("session", &self.session)
            .field("legacy", &self.legacy)
            .finish()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(session: Arc<dyn KeyValueStore>) -> Self {
        Self {
            session: Some(session),
            legacy: None,
        }
    }

    /// A store with no backing storage; every call is a no-op.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    /// Long-lived storage older releases wrote tokens to. It is only ever
    /// cleared, never read.
    #[must_use]
    pub fn with_legacy(mut self, legacy: Arc<dyn KeyValueStore>) -> Self {
        self.legacy = Some(legacy);
        self
    }

    /// Persists the session. The refresh token and user data are only written
    /// when present, so a refresh response without them keeps the old values.
    ///
    /// # Errors
    /// Returns `StorageError` if the backing storage rejects a write.
    pub fn store(&self, session: &Session) -> Result<(), StorageError> {
        let Some(storage) = &self.session else {
            return Ok(());
        };

        storage.set_item(
            SessionKey::AccessToken.storage_key(),
            session.access_token.expose_secret(),
        )?;
        storage.set_item(
            SessionKey::IdToken.storage_key(),
            session.id_token.expose_secret(),
        )?;
        if let Some(refresh_token) = &session.refresh_token {
            storage.set_item(
                SessionKey::RefreshToken.storage_key(),
                refresh_token.expose_secret(),
            )?;
        }
        if let Some(user) = &session.user {
            storage.set_item(SessionKey::UserData.storage_key(), &user.to_string())?;
        }

        debug!(
            refresh_token = session.refresh_token.is_some(),
            user = session.user.is_some(),
            "session stored"
        );
        Ok(())
    }

    /// Removes every session key from both storages. Failures are logged and
    /// the remaining keys are still attempted.
    pub fn clear(&self) {
        for storage in [&self.session, &self.legacy].into_iter().flatten() {
            for key in SessionKey::ALL {
                if let Err(err) = storage.remove_item(key.storage_key()) {
                    warn!(key = key.storage_key(), "failed to clear session key: {err}");
                }
            }
        }
        debug!("session cleared");
    }

    fn read(&self, key: SessionKey) -> Option<String> {
        self.session.as_ref()?.get_item(key.storage_key())
    }

    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        self.read(SessionKey::AccessToken).map(SecretString::from)
    }

    #[must_use]
    pub fn id_token(&self) -> Option<SecretString> {
        self.read(SessionKey::IdToken).map(SecretString::from)
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<SecretString> {
        self.read(SessionKey::RefreshToken)
            .filter(|token| !token.is_empty())
            .map(SecretString::from)
    }

    /// Cached user profile; unparseable data reads as absent.
    #[must_use]
    pub fn user_data(&self) -> Option<Value> {
        let raw = self.read(SessionKey::UserData)?;
        serde_json::from_str::<Value>(&raw)
            .ok()
            .filter(|user| !user.is_null())
    }

    /// True iff both tokens are present and valid. A present but invalid token
    /// (blank or `"null"`) purges the whole session.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        let access_token = self.read(SessionKey::AccessToken);
        let id_token = self.read(SessionKey::IdToken);

        let corrupt = [&access_token, &id_token]
            .into_iter()
            .flatten()
            .any(|token| !is_valid_token(token));
        if corrupt {
            warn!("invalid token values in session storage, clearing session");
            self.clear();
            return false;
        }

        access_token.is_some() && id_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryStorage, Session, SessionKey, SessionStore};
    use anyhow::Result;
    use secrecy::ExposeSecret;
    use serde_json::json;
    use std::sync::Arc;

    fn store_with_memory() -> (SessionStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (SessionStore::new(storage.clone()), storage)
    }

    fn session(access: &str, id: &str) -> Result<Session> {
        Session::from_tokens(Some(access), Some(id), Some("r"), Some(json!({ "id": 1 })))
            .ok_or_else(|| anyhow::anyhow!("session should build"))
    }

    #[test]
    fn store_then_read_returns_exact_values() -> Result<()> {
        let (store, _) = store_with_memory();
        store.store(&session("a", "b")?)?;

        assert_eq!(
            store.access_token().map(|t| t.expose_secret().to_string()),
            Some("a".to_string())
        );
        assert_eq!(
            store.id_token().map(|t| t.expose_secret().to_string()),
            Some("b".to_string())
        );
        assert_eq!(
            store.refresh_token().map(|t| t.expose_secret().to_string()),
            Some("r".to_string())
        );
        assert_eq!(store.user_data(), Some(json!({ "id": 1 })));
        assert!(store.is_authenticated());
        Ok(())
    }

    #[test]
    fn clear_empties_every_getter() -> Result<()> {
        let (store, _) = store_with_memory();
        store.store(&session("a", "b")?)?;
        store.clear();

        assert!(store.access_token().is_none());
        assert!(store.id_token().is_none());
        assert!(store.refresh_token().is_none());
        assert!(store.user_data().is_none());
        assert!(!store.is_authenticated());
        Ok(())
    }

    #[test]
    fn clear_also_empties_legacy_storage() -> Result<()> {
        let legacy = Arc::new(MemoryStorage::new());
        legacy.set_item("geminis_access_token", "old")?;
        legacy.set_item("geminis_user_data", "{}")?;
        legacy.set_item("selectedTheme", "vibrant")?;

        let store = SessionStore::new(Arc::new(MemoryStorage::new())).with_legacy(legacy.clone());
        store.clear();

        assert_eq!(legacy.get_item("geminis_access_token"), None);
        assert_eq!(legacy.get_item("geminis_user_data"), None);
        assert_eq!(legacy.get_item("selectedTheme").as_deref(), Some("vibrant"));
        Ok(())
    }

    #[test]
    fn is_authenticated_truth_table() -> Result<()> {
        let cases: [(Option<&str>, Option<&str>, bool); 8] = [
            (Some("a"), Some("b"), true),
            (None, None, false),
            (Some("a"), None, false),
            (None, Some("b"), false),
            (Some(""), Some(""), false),
            (Some("null"), Some("b"), false),
            (Some("a"), Some("   "), false),
            (Some("a"), Some("null"), false),
        ];

        for (access, id, expected) in cases {
            let (store, storage) = store_with_memory();
            if let Some(access) = access {
                storage.set_item(SessionKey::AccessToken.storage_key(), access)?;
            }
            if let Some(id) = id {
                storage.set_item(SessionKey::IdToken.storage_key(), id)?;
            }
            assert_eq!(
                store.is_authenticated(),
                expected,
                "access={access:?} id={id:?}"
            );
        }
        Ok(())
    }

    #[test]
    fn invalid_token_purges_all_keys() -> Result<()> {
        let (store, storage) = store_with_memory();
        storage.set_item("geminis_access_token", "valid")?;
        storage.set_item("geminis_id_token", "null")?;
        storage.set_item("geminis_refresh_token", "refresh")?;
        storage.set_item("geminis_user_data", r#"{"id":1}"#)?;

        assert!(!store.is_authenticated());
        for key in SessionKey::ALL {
            assert_eq!(storage.get_item(key.storage_key()), None, "{key:?}");
        }
        Ok(())
    }

    #[test]
    fn missing_tokens_do_not_purge_user_data() -> Result<()> {
        let (store, storage) = store_with_memory();
        storage.set_item("geminis_user_data", r#"{"id":1}"#)?;

        assert!(!store.is_authenticated());
        assert_eq!(store.user_data(), Some(json!({ "id": 1 })));
        Ok(())
    }

    #[test]
    fn unparseable_user_data_reads_as_none() -> Result<()> {
        let (store, storage) = store_with_memory();
        storage.set_item("geminis_user_data", "{broken")?;
        assert_eq!(store.user_data(), None);
        Ok(())
    }

    #[test]
    fn store_keeps_previous_refresh_token_when_absent() -> Result<()> {
        let (store, _) = store_with_memory();
        store.store(&session("a", "b")?)?;

        let refreshed = Session::from_tokens(Some("a2"), Some("b2"), None, None)
            .ok_or_else(|| anyhow::anyhow!("session should build"))?;
        store.store(&refreshed)?;

        assert_eq!(
            store.access_token().map(|t| t.expose_secret().to_string()),
            Some("a2".to_string())
        );
        assert_eq!(
            store.refresh_token().map(|t| t.expose_secret().to_string()),
            Some("r".to_string())
        );
        assert_eq!(store.user_data(), Some(json!({ "id": 1 })));
        Ok(())
    }

    #[test]
    fn keys_share_the_storage_prefix() {
        for key in SessionKey::ALL {
            assert!(key.storage_key().starts_with(super::STORAGE_PREFIX), "{key:?}");
        }
    }

    #[test]
    fn from_tokens_rejects_missing_or_invalid_tokens() {
        assert!(Session::from_tokens(None, Some("b"), None, None).is_none());
        assert!(Session::from_tokens(Some("a"), None, None, None).is_none());
        assert!(Session::from_tokens(Some(""), Some("b"), None, None).is_none());
        assert!(Session::from_tokens(Some("a"), Some("null"), None, None).is_none());
        assert!(Session::from_tokens(Some("a"), Some("b"), None, None).is_some());
    }

    #[test]
    fn debug_output_redacts_tokens() -> Result<()> {
        let rendered = format!("{:?}", session("secret-access", "secret-id")?);
        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("secret-id"));
        Ok(())
    }

    #[test]
    fn detached_store_is_a_noop() -> Result<()> {
        let store = SessionStore::detached();
        store.store(&session("a", "b")?)?;
        store.clear();

        assert!(store.access_token().is_none());
        assert!(store.id_token().is_none());
        assert!(store.user_data().is_none());
        assert!(!store.is_authenticated());
        Ok(())
    }
}
