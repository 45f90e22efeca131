//! API base URL, timeout, endpoint paths and default headers. Configuration
//! values are public; tokens are only ever passed in per request.

use std::time::Duration;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
/// Default request timeout (milliseconds) applied to every request.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// REST endpoints consumed by the client.
pub mod endpoints {
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const REFRESH_TOKEN: &str = "/api/v1/auth/refresh";
    pub const FORGOT_PASSWORD: &str = "/api/v1/auth/forgot-password";
    pub const RESET_PASSWORD: &str = "/api/v1/auth/reset-password";
    pub const CHANGE_PASSWORD: &str = "/api/v1/auth/password";

    pub const REGISTER: &str = "/api/v1/clients";
    pub const GET_CLIENT: &str = "/api/v1/clients";
    pub const CONFIRM_EMAIL: &str = "/api/v1/auth/verify-email";
    pub const RESEND_VERIFICATION: &str = "/api/v1/auth/resend-verification";

    pub const GET_USER_ME: &str = "/api/v1/users/me";
    pub const GET_USERS: &str = "/api/v1/users";
    pub const ACCEPT_INVITATION: &str = "/api/v1/users/accept-invitation";

    pub const ORGANIZATIONS: &str = "/api/v1/organizations";

    pub const SEND_CONTACT_MESSAGE: &str = "/api/v1/contact/send-message";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ApiConfig {
    /// Builds a config for `base_url`; blank values fall back to the default URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim();
        Self {
            base_url: if base_url.is_empty() {
                DEFAULT_BASE_URL.to_string()
            } else {
                base_url.to_string()
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Joins the configured base URL and an endpoint path.
    #[must_use]
    pub fn build_url(&self, endpoint: &str) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        let endpoint = endpoint.trim();

        if base.is_empty() {
            endpoint.to_string()
        } else {
            format!("{}/{}", base, endpoint.trim_start_matches('/'))
        }
    }
}

/// Headers sent with every request. `Authorization` is only added for a
/// non-empty token.
#[must_use]
pub fn request_headers(token: Option<&str>) -> Vec<(String, String)> {
    let mut headers = vec![
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Accept".to_string(), "application/json".to_string()),
    ];

    if let Some(token) = token.filter(|token| !token.is_empty()) {
        headers.push(("Authorization".to_string(), format!("Bearer {token}")));
    }

    headers
}
