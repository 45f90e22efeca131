//! HTTP transport for the Geminis REST API with a fixed timeout policy and typed
//! failures. Feature services go through [`ApiClient`] so headers, timeouts and
//! error normalization stay in one place. Tokens are attached per request and
//! never logged.
//!
//! A 401 response runs the injected [`SessionExpiryHandler`] before the error is
//! handed back, which is how the transport reaches the auth state layer without
//! depending on it.

pub mod config;
pub mod errors;

pub use config::{ApiConfig, endpoints, request_headers};
pub use errors::{ApiError, ErrorPayload, MAX_ERROR_CHARS};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::{Value, json};
use std::{fmt, sync::Arc};
use tokio::time::timeout;
use tracing::{debug, warn};
use url::form_urlencoded;

/// Fallback message when an error body is JSON without a `message` field.
const GENERIC_ERROR_MESSAGE: &str = "Error en la petición";

/// Capability the transport calls when the API answers 401.
#[async_trait]
pub trait SessionExpiryHandler: Send + Sync {
    async fn session_expired(&self);
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
    on_session_expired: Option<Arc<dyn SessionExpiryHandler>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ApiClient")
            .field("config", &self.config)
            .field("on_session_expired", &self.on_session_expired.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client for the given API configuration.
    ///
    /// # Errors
    /// Returns `ApiError::Network` if the underlying HTTP client cannot be
    /// initialized (for example when the TLS backend fails to load).
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()
            .map_err(|err| ApiError::network(&err))?;

        Ok(Self {
            http,
            config,
            on_session_expired: None,
        })
    }

    /// Registers the reaction run on every 401 response.
    #[must_use]
    pub fn with_session_expiry(mut self, handler: Arc<dyn SessionExpiryHandler>) -> Self {
        self.on_session_expired = Some(handler);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Sends a request and returns the parsed JSON body, or the raw text as a
    /// JSON string when the body is not JSON.
    ///
    /// # Errors
    /// Every failure is an [`ApiError`]: `Timeout` when the configured timeout
    /// elapses, `Network` when no response arrived, and a status-classified
    /// variant for any non-2xx response.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let url = self.config.build_url(endpoint);
        debug!(%method, endpoint, authenticated = token.is_some(), "api request");

        let mut builder = self.http.request(method, &url);
        for (name, value) in request_headers(token) {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }

        let result = match timeout(self.config.timeout, send(builder)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(endpoint, timeout_ms = %self.config.timeout.as_millis(), "api request timed out");
                Err(ApiError::timeout())
            }
        };

        if let Err(error) = &result {
            debug!(endpoint, status = error.status(), "api request failed");
            if error.is_session_expired() {
                self.notify_session_expired().await;
            }
        }

        result
    }

    /// GET with optional query parameters.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let endpoint = with_query(endpoint, params);
        self.request(Method::GET, &endpoint, None, token).await
    }

    /// POST with a JSON body.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let body = encode(body)?;
        self.request(Method::POST, endpoint, Some(body), token).await
    }

    /// PATCH with a JSON body.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let body = encode(body)?;
        self.request(Method::PATCH, endpoint, Some(body), token).await
    }

    /// PUT with a JSON body.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let body = encode(body)?;
        self.request(Method::PUT, endpoint, Some(body), token).await
    }

    /// DELETE without a body.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn delete(&self, endpoint: &str, token: Option<&str>) -> Result<Value, ApiError> {
        self.request(Method::DELETE, endpoint, None, token).await
    }

    async fn notify_session_expired(&self) {
        match &self.on_session_expired {
            Some(handler) => {
                warn!("api answered 401, running session expiry reaction");
                handler.session_expired().await;
            }
            None => debug!("api answered 401 with no session expiry reaction registered"),
        }
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|err| {
        warn!("request body could not be encoded: {err}");
        ApiError::serialization(&err)
    })
}

fn with_query(endpoint: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return endpoint.to_string();
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!("{endpoint}{separator}{query}")
}

async fn send(builder: RequestBuilder) -> Result<Value, ApiError> {
    let response = builder.send().await.map_err(|err| ApiError::network(&err))?;

    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }

    let text = response.text().await.map_err(|err| ApiError::network(&err))?;
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

/// Builds the typed error for a non-2xx response, synthesizing a message when
/// the body is not JSON.
async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    let code = status.as_u16();
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<Value>(&body) {
        Ok(data) => {
            let message = data
                .get("message")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|message| !message.is_empty())
                .map_or(GENERIC_ERROR_MESSAGE, errors::truncate_error_text)
                .to_string();
            ApiError::from_status(code, message, data)
        }
        Err(_) => {
            let message = format!(
                "Error {code}: {}",
                status.canonical_reason().unwrap_or("Unknown")
            );
            let data = json!({ "message": message, "status": code });
            ApiError::from_status(code, message, data)
        }
    }
}
