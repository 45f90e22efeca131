//! Request and response types for auth-related API calls. Passwords and tokens
//! are held as secrets and only exposed while a request body is serialized.

use crate::session::Session;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn expose_ref<S: Serializer>(secret: &&SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    expose(secret, serializer)
}

#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }
}

/// Sign-up form. The API names the full name `name`.
#[derive(Clone, Debug, Serialize)]
pub struct Registration {
    #[serde(rename = "name")]
    pub full_name: String,
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct EmailRequest<'a> {
    pub email: &'a str,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct ResetPasswordRequest<'a> {
    pub email: &'a str,
    pub code: &'a str,
    #[serde(serialize_with = "expose_ref")]
    pub new_password: &'a SecretString,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct AcceptInvitationRequest<'a> {
    pub token: &'a str,
    #[serde(serialize_with = "expose_ref")]
    pub password: &'a SecretString,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    #[serde(serialize_with = "expose_ref")]
    pub refresh_token: &'a SecretString,
}

/// Token bundle returned by login and refresh. Every field is optional on the
/// wire; [`TokenResponse::into_session`] decides whether it is usable.
#[derive(Clone, Default, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
}

impl TokenResponse {
    pub fn into_session(self) -> Option<Session> {
        Session::from_tokens(
            self.access_token.as_deref(),
            self.id_token.as_deref(),
            self.refresh_token.as_deref(),
            self.user,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Credentials, Registration, ResetPasswordRequest, TokenResponse};
    use anyhow::Result;
    use secrecy::SecretString;
    use serde_json::json;

    #[test]
    fn registration_serializes_full_name_as_name() -> Result<()> {
        let registration = Registration {
            full_name: "Ana Pérez".to_string(),
            email: "ana@example.com".to_string(),
            password: SecretString::from("s3cret"),
        };
        assert_eq!(
            serde_json::to_value(&registration)?,
            json!({ "name": "Ana Pérez", "email": "ana@example.com", "password": "s3cret" })
        );
        Ok(())
    }

    #[test]
    fn debug_never_prints_passwords() {
        let credentials = Credentials::new("ana@example.com", SecretString::from("s3cret"));
        assert!(!format!("{credentials:?}").contains("s3cret"));
    }

    #[test]
    fn reset_request_uses_new_password_field() -> Result<()> {
        let password = SecretString::from("n3w");
        let request = ResetPasswordRequest {
            email: "ana@example.com",
            code: "123456",
            new_password: &password,
        };
        assert_eq!(
            serde_json::to_value(&request)?,
            json!({ "email": "ana@example.com", "code": "123456", "new_password": "n3w" })
        );
        Ok(())
    }

    #[test]
    fn token_response_requires_both_tokens() -> Result<()> {
        let response: TokenResponse =
            serde_json::from_value(json!({ "access_token": "a", "id_token": "b", "user": { "id": 1 } }))?;
        let session = response.into_session();
        assert_eq!(session.and_then(|s| s.user), Some(json!({ "id": 1 })));

        let response: TokenResponse = serde_json::from_value(json!({ "access_token": "a" }))?;
        assert!(response.into_session().is_none());

        let response: TokenResponse =
            serde_json::from_value(json!({ "access_token": "a", "id_token": null }))?;
        assert!(response.into_session().is_none());
        Ok(())
    }
}
