use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Account as returned by `/users/me` and `/users`. Fields the client does not
/// interpret are kept in `extra` so a merge never drops server data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_master: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    #[must_use]
    pub fn role_label(&self) -> &'static str {
        role_label(self.is_master)
    }
}

/// Display label of the account role.
#[must_use]
pub fn role_label(is_master: bool) -> &'static str {
    if is_master {
        "Administrador principal"
    } else {
        "Usuario vinculado"
    }
}

/// `null` and non-boolean values read as `false`.
fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

fn expose<S: Serializer>(secret: &&SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[derive(Serialize)]
pub(crate) struct ChangePasswordRequest<'a> {
    #[serde(serialize_with = "expose")]
    pub old_password: &'a SecretString,
    #[serde(serialize_with = "expose")]
    pub new_password: &'a SecretString,
}
