//! Uniform result shape returned by every flow and the policies that turn a
//! transport failure into the short message shown to the user. The typed
//! [`ApiError`] is kept on the failure for diagnostics only.

use crate::{api::ApiError, session::StorageError};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

const SERVER_MESSAGE: &str = "Error del servidor. Intenta más tarde.";
const NETWORK_MESSAGE: &str = "Error de conexión. Verifica tu internet.";

#[derive(Clone, Debug, PartialEq)]
pub struct FlowSuccess<T> {
    pub message: String,
    pub data: T,
}

impl<T> FlowSuccess<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
#[error("{message}")]
pub struct FlowFailure {
    /// Short user-facing message.
    pub message: String,
    /// Transport error behind the failure, when there was one.
    pub error: Option<ApiError>,
    /// Server payload kept for field-level rendering (validation errors).
    pub details: Value,
}

impl FlowFailure {
    #[must_use]
    pub fn local(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
            details: empty_details(),
        }
    }

    /// HTTP status of the underlying transport error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.error.as_ref().map(ApiError::status)
    }
}

pub type FlowResult<T> = Result<FlowSuccess<T>, FlowFailure>;

/// Failure raised inside a flow, before a policy classifies it.
#[derive(Debug)]
pub(crate) enum FlowError {
    Api(ApiError),
    Local(String),
    /// Success body that does not match the expected shape.
    Decode(serde_json::Error),
}

impl From<ApiError> for FlowError {
    fn from(error: ApiError) -> Self {
        FlowError::Api(error)
    }
}

impl From<StorageError> for FlowError {
    fn from(error: StorageError) -> Self {
        FlowError::Local(error.to_string())
    }
}

/// Decodes a success body into a typed value.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, FlowError> {
    serde_json::from_value(value).map_err(FlowError::Decode)
}

/// Splits off failures that never reached a status-based policy.
fn api_error(error: FlowError, default_message: &str) -> Result<ApiError, FlowFailure> {
    match error {
        FlowError::Api(error) => Ok(error),
        FlowError::Local(message) => Err(local_failure(message, default_message)),
        FlowError::Decode(err) => {
            warn!("unexpected response body: {err}");
            Err(FlowFailure::local(default_message))
        }
    }
}

/// Message policy of the authentication flows.
pub(crate) fn auth_failure(error: FlowError, default_message: &str) -> FlowFailure {
    let error = match api_error(error, default_message) {
        Ok(error) => error,
        Err(failure) => return failure,
    };

    let (message, details) = match &error {
        ApiError::Validation(payload) => (
            error.detail().unwrap_or("Datos inválidos").to_string(),
            details_of(&payload.data),
        ),
        ApiError::Auth(payload) if payload.status == 403 => match error.detail() {
            Some(detail) => (detail.to_string(), details_of(&payload.data)),
            None => ("Acceso denegado".to_string(), empty_details()),
        },
        ApiError::Auth(_) => ("Credenciales inválidas".to_string(), empty_details()),
        ApiError::NotFound(payload) => (
            error
                .detail()
                .unwrap_or("Usuario no se encuentra registrado")
                .to_string(),
            details_of(&payload.data),
        ),
        ApiError::Server(_) => (SERVER_MESSAGE.to_string(), empty_details()),
        ApiError::Network { .. } => (NETWORK_MESSAGE.to_string(), empty_details()),
        ApiError::Serialization { .. } => (error.message().to_string(), empty_details()),
        ApiError::Timeout { .. } | ApiError::Unclassified(_) => (
            error
                .detail()
                .or_else(|| non_empty(error.message()))
                .unwrap_or(default_message)
                .to_string(),
            details_of(error.data()),
        ),
    };

    FlowFailure {
        message,
        error: Some(error),
        details,
    }
}

/// Message policy of the user/profile operations.
pub(crate) fn user_failure(error: FlowError, default_message: &str) -> FlowFailure {
    let error = match api_error(error, default_message) {
        Ok(error) => error,
        Err(failure) => return failure,
    };

    let (message, details) = match &error {
        ApiError::Validation(payload) => (
            validation_message(&payload.data),
            details_of(&payload.data),
        ),
        ApiError::Auth(_) => (
            "Sesión expirada o sin permisos".to_string(),
            empty_details(),
        ),
        ApiError::Server(_) => (SERVER_MESSAGE.to_string(), empty_details()),
        ApiError::Network { .. } => (NETWORK_MESSAGE.to_string(), empty_details()),
        ApiError::Serialization { .. } => (error.message().to_string(), empty_details()),
        ApiError::Timeout { .. } | ApiError::NotFound(_) | ApiError::Unclassified(_) => (
            non_empty(error.message())
                .unwrap_or(default_message)
                .to_string(),
            empty_details(),
        ),
    };

    FlowFailure {
        message,
        error: Some(error),
        details,
    }
}

fn validation_message(data: &Value) -> String {
    match data.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => detail.clone(),
        Some(Value::Array(items)) if !items.is_empty() => items[0]
            .get("msg")
            .and_then(Value::as_str)
            .unwrap_or("Datos inválidos")
            .to_string(),
        _ => "Error de validación".to_string(),
    }
}

fn local_failure(message: String, default_message: &str) -> FlowFailure {
    if message.trim().is_empty() {
        FlowFailure::local(default_message)
    } else {
        FlowFailure::local(message)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.trim().is_empty()).then_some(value)
}

fn empty_details() -> Value {
    Value::Object(Map::new())
}

fn details_of(data: &Value) -> Value {
    if data.is_null() {
        empty_details()
    } else {
        data.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{FlowError, FlowFailure, auth_failure, user_failure};
    use crate::api::ApiError;
    use serde_json::{Value, json};

    fn api(status: u16, data: Value) -> FlowError {
        FlowError::Api(ApiError::from_status(status, "Error en la petición", data))
    }

    fn auth(error: FlowError) -> FlowFailure {
        auth_failure(error, "Error al iniciar sesión")
    }

    #[test]
    fn auth_validation_prefers_detail() {
        let failure = auth(api(422, json!({ "detail": "Email ya registrado" })));
        assert_eq!(failure.message, "Email ya registrado");
        assert_eq!(failure.details["detail"], "Email ya registrado");

        let failure = auth(api(422, json!({ "detail": [{ "msg": "field required" }] })));
        assert_eq!(failure.message, "field required");

        let failure = auth(api(400, json!({})));
        assert_eq!(failure.message, "Datos inválidos");
    }

    #[test]
    fn auth_distinguishes_401_and_403() {
        let failure = auth(api(401, json!({ "detail": "whatever" })));
        assert_eq!(failure.message, "Credenciales inválidas");
        assert_eq!(failure.status(), Some(401));

        let failure = auth(api(403, json!({ "detail": "Email no verificado" })));
        assert_eq!(failure.message, "Email no verificado");

        let failure = auth(api(403, json!({})));
        assert_eq!(failure.message, "Acceso denegado");
    }

    #[test]
    fn auth_not_found_prefers_detail() {
        let failure = auth(api(404, json!({ "detail": "Cliente no existe" })));
        assert_eq!(failure.message, "Cliente no existe");

        let failure = auth(api(404, json!({})));
        assert_eq!(failure.message, "Usuario no se encuentra registrado");
    }

    #[test]
    fn auth_server_and_network_use_generic_messages() {
        let failure = auth(api(503, json!({ "detail": "db down" })));
        assert_eq!(failure.message, "Error del servidor. Intenta más tarde.");

        let io = std::io::Error::other("dns");
        let failure = auth(FlowError::Api(ApiError::network(&io)));
        assert_eq!(failure.message, "Error de conexión. Verifica tu internet.");
        assert_eq!(failure.status(), Some(0));
    }

    #[test]
    fn encoding_failures_are_not_reported_as_connectivity() {
        let Err(err) = serde_json::from_str::<Value>("{") else {
            return;
        };
        let error = || FlowError::Api(ApiError::serialization(&err));

        let failure = auth(error());
        assert_eq!(failure.message, "No se pudo preparar la petición");
        let failure = user_failure(error(), "Error al cambiar la contraseña");
        assert_eq!(failure.message, "No se pudo preparar la petición");
    }

    #[test]
    fn auth_other_statuses_fall_back_in_order() {
        let failure = auth(api(409, json!({ "detail": "Conflicto" })));
        assert_eq!(failure.message, "Conflicto");
        assert_eq!(failure.details["detail"], "Conflicto");

        let failure = auth(FlowError::Api(ApiError::from_status(409, "Ya existe", json!({}))));
        assert_eq!(failure.message, "Ya existe");

        let failure = auth(FlowError::Api(ApiError::from_status(409, "", json!({}))));
        assert_eq!(failure.message, "Error al iniciar sesión");

        let failure = auth(FlowError::Api(ApiError::timeout()));
        assert_eq!(failure.message, "Tiempo de espera agotado");
        assert_eq!(failure.details, json!({}));
    }

    #[test]
    fn local_errors_keep_their_message() {
        let failure = auth(FlowError::Local("No hay token de acceso disponible".to_string()));
        assert_eq!(failure.message, "No hay token de acceso disponible");
        assert!(failure.error.is_none());

        let failure = auth(FlowError::Local(String::new()));
        assert_eq!(failure.message, "Error al iniciar sesión");
    }

    #[test]
    fn user_policy_messages() {
        let default = "Error al obtener usuarios asociados";

        let failure = user_failure(api(422, json!({ "detail": [{ "msg": "too short" }] })), default);
        assert_eq!(failure.message, "too short");

        let failure = user_failure(api(422, json!({})), default);
        assert_eq!(failure.message, "Error de validación");

        let failure = user_failure(api(422, json!({ "detail": [{ "loc": ["body"] }] })), default);
        assert_eq!(failure.message, "Datos inválidos");

        let failure = user_failure(api(403, json!({ "detail": "x" })), default);
        assert_eq!(failure.message, "Sesión expirada o sin permisos");

        let failure = user_failure(api(500, json!({})), default);
        assert_eq!(failure.message, "Error del servidor. Intenta más tarde.");

        let failure = user_failure(
            FlowError::Api(ApiError::from_status(404, "No encontrado", json!({}))),
            default,
        );
        assert_eq!(failure.message, "No encontrado");
    }

    #[test]
    fn decode_errors_use_the_default_message() {
        let failure = match super::decode::<bool>(json!(null)) {
            Ok(_) => FlowFailure::local("decoded"),
            Err(error) => user_failure(error, "Error al obtener información del usuario"),
        };
        assert_eq!(failure.message, "Error al obtener información del usuario");
        assert!(failure.error.is_none());
    }

    #[test]
    fn failure_displays_its_message() {
        assert_eq!(FlowFailure::local("Sesión expirada").to_string(), "Sesión expirada");
    }
}
