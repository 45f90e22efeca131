//! Typed transport failures. Every failure leaving [`super::ApiClient`] is one of
//! these variants; callers dispatch on the variant instead of inspecting status
//! codes by hand.

use serde_json::{Value, json};
use thiserror::Error;

/// Status reported for failures that never produced an HTTP response.
pub const NETWORK_STATUS: u16 = 0;
/// Status reported when the client aborts a request on its own timeout.
pub const TIMEOUT_STATUS: u16 = 408;

/// Longest server-provided text surfaced to the user.
pub const MAX_ERROR_CHARS: usize = 200;

static NO_DATA: Value = Value::Null;

/// Cuts `text` to at most [`MAX_ERROR_CHARS`] characters.
#[must_use]
pub fn truncate_error_text(text: &str) -> &str {
    text.char_indices()
        .nth(MAX_ERROR_CHARS)
        .map_or(text, |(end, _)| &text[..end])
}

/// Error body and status of a failed HTTP exchange.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorPayload {
    pub status: u16,
    pub message: String,
    pub data: Value,
}

impl ErrorPayload {
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>, data: Value) -> Self {
        Self {
            status,
            message: message.into(),
            data,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ApiError {
    /// Connection failure or any other error raised before a response arrived.
    #[error("{message}")]
    Network { message: String, data: Value },
    /// The client gave up waiting for the response.
    #[error("{message}")]
    Timeout { message: String },
    /// The request body could not be encoded; nothing was sent.
    #[error("{message}")]
    Serialization { message: String, data: Value },
    /// 400 or 422.
    #[error("{}", .0.message)]
    Validation(ErrorPayload),
    /// 401 or 403.
    #[error("{}", .0.message)]
    Auth(ErrorPayload),
    /// 404.
    #[error("{}", .0.message)]
    NotFound(ErrorPayload),
    /// 5xx.
    #[error("{}", .0.message)]
    Server(ErrorPayload),
    /// Any other non-2xx status.
    #[error("{}", .0.message)]
    Unclassified(ErrorPayload),
}

impl ApiError {
    /// Classifies a non-2xx response by status code.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>, data: Value) -> Self {
        let payload = ErrorPayload::new(status, message, data);
        match status {
            400 | 422 => Self::Validation(payload),
            401 | 403 => Self::Auth(payload),
            404 => Self::NotFound(payload),
            500.. => Self::Server(payload),
            _ => Self::Unclassified(payload),
        }
    }

    /// Wraps a lower-level failure that never produced a response.
    #[must_use]
    pub fn network(source: &dyn std::error::Error) -> Self {
        Self::Network {
            message: "Error de conexión".to_string(),
            data: json!({ "original_error": source.to_string() }),
        }
    }

    #[must_use]
    pub fn serialization(source: &serde_json::Error) -> Self {
        Self::Serialization {
            message: "No se pudo preparar la petición".to_string(),
            data: json!({ "original_error": source.to_string() }),
        }
    }

    #[must_use]
    pub fn timeout() -> Self {
        Self::Timeout {
            message: "Tiempo de espera agotado".to_string(),
        }
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Network { .. } | Self::Serialization { .. } => NETWORK_STATUS,
            Self::Timeout { .. } => TIMEOUT_STATUS,
            Self::Validation(payload)
            | Self::Auth(payload)
            | Self::NotFound(payload)
            | Self::Server(payload)
            | Self::Unclassified(payload) => payload.status,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Network { message, .. }
            | Self::Serialization { message, .. }
            | Self::Timeout { message } => message,
            Self::Validation(payload)
            | Self::Auth(payload)
            | Self::NotFound(payload)
            | Self::Server(payload)
            | Self::Unclassified(payload) => &payload.message,
        }
    }

    /// Diagnostic body attached to the error; `Null` for client-side timeouts.
    #[must_use]
    pub fn data(&self) -> &Value {
        match self {
            Self::Network { data, .. } | Self::Serialization { data, .. } => data,
            Self::Timeout { .. } => &NO_DATA,
            Self::Validation(payload)
            | Self::Auth(payload)
            | Self::NotFound(payload)
            | Self::Server(payload)
            | Self::Unclassified(payload) => &payload.data,
        }
    }

    /// True for the status that triggers the session-expiry reaction.
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Auth(payload) if payload.status == 401)
    }

    /// Human readable `detail` sent by the server, if any.
    ///
    /// A string detail is returned as is; a list of validation errors yields the
    /// `msg` of its first entry.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self.data().get("detail")? {
            Value::String(detail) if !detail.trim().is_empty() => Some(truncate_error_text(detail)),
            Value::Array(items) => items.first()?.get("msg")?.as_str().map(truncate_error_text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_classifies_by_code() {
        let cases = [
            (400, "validation"),
            (422, "validation"),
            (401, "auth"),
            (403, "auth"),
            (404, "not_found"),
            (500, "server"),
            (503, "server"),
            (409, "unclassified"),
            (429, "unclassified"),
        ];
        for (status, expected) in cases {
            let kind = match ApiError::from_status(status, "boom", Value::Null) {
                ApiError::Validation(_) => "validation",
                ApiError::Auth(_) => "auth",
                ApiError::NotFound(_) => "not_found",
                ApiError::Server(_) => "server",
                ApiError::Unclassified(_) => "unclassified",
                ApiError::Network { .. }
                | ApiError::Serialization { .. }
                | ApiError::Timeout { .. } => "local",
            };
            assert_eq!(kind, expected, "status {status}");
        }
    }

    #[test]
    fn status_reports_sentinels_for_local_failures() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(ApiError::network(&io).status(), 0);
        assert_eq!(ApiError::timeout().status(), 408);
        assert_eq!(ApiError::timeout().message(), "Tiempo de espera agotado");
        assert_eq!(
            ApiError::from_status(418, "teapot", Value::Null).status(),
            418
        );
    }

    #[test]
    fn network_error_keeps_original_error_text() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = ApiError::network(&io);
        assert_eq!(error.message(), "Error de conexión");
        assert_eq!(error.data()["original_error"], "refused");
    }

    #[test]
    fn detail_reads_string_and_first_validation_entry() {
        let error = ApiError::from_status(403, "x", json!({ "detail": "Email no verificado" }));
        assert_eq!(error.detail(), Some("Email no verificado"));

        let error = ApiError::from_status(
            422,
            "x",
            json!({ "detail": [{ "msg": "field required" }, { "msg": "other" }] }),
        );
        assert_eq!(error.detail(), Some("field required"));

        let error = ApiError::from_status(422, "x", json!({ "detail": [] }));
        assert_eq!(error.detail(), None);

        let error = ApiError::from_status(404, "x", json!({ "detail": "  " }));
        assert_eq!(error.detail(), None);

        assert_eq!(ApiError::timeout().detail(), None);
    }

    #[test]
    fn long_detail_is_truncated_on_a_char_boundary() {
        let long = "é".repeat(MAX_ERROR_CHARS + 50);
        let error = ApiError::from_status(400, "x", json!({ "detail": long }));
        assert_eq!(error.detail().map(|d| d.chars().count()), Some(MAX_ERROR_CHARS));
        assert_eq!(truncate_error_text("short"), "short");
    }

    #[test]
    fn only_401_counts_as_session_expired() {
        assert!(ApiError::from_status(401, "x", Value::Null).is_session_expired());
        assert!(!ApiError::from_status(403, "x", Value::Null).is_session_expired());
        assert!(!ApiError::timeout().is_session_expired());
    }

    #[test]
    fn display_uses_message() {
        let error = ApiError::from_status(500, "Error 500: Internal Server Error", Value::Null);
        assert_eq!(error.to_string(), "Error 500: Internal Server Error");
    }
}
