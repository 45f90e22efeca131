//! Auth flows over the Geminis API. Each flow performs one request, applies its
//! side effect on the session store and answers with a flow outcome; transport
//! failures are classified by the auth message policy and never escape raw.

use crate::{
    api::{ApiClient, endpoints},
    features::{
        auth::types::{
            AcceptInvitationRequest, Credentials, EmailRequest, RefreshRequest, Registration,
            ResetPasswordRequest, TokenResponse,
        },
        outcome::{FlowError, FlowResult, FlowSuccess, auth_failure},
    },
    session::{Session, SessionStore, is_valid_token},
};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::form_urlencoded;

const REGISTERED: &str = "Cliente creado exitosamente. Revisa tu correo para verificar tu email antes de iniciar sesión.";
const LOGGED_IN: &str = "Sesión iniciada exitosamente";
const LOGGED_OUT: &str = "Sesión cerrada exitosamente";
const RESET_REQUESTED: &str =
    "Si el correo existe, recibirás un código para restablecer tu contraseña.";
const PASSWORD_RESET: &str =
    "Tu contraseña ha sido restablecida correctamente. Ya puedes iniciar sesión.";
const EMAIL_CONFIRMED: &str = "Cuenta activada correctamente. Ahora puedes iniciar sesión.";
const VERIFICATION_RESENT: &str =
    "Si el email existe y no está verificado, recibirás un nuevo código.";
const INVITATION_ACCEPTED: &str = "Invitación aceptada exitosamente. Ya puedes iniciar sesión.";
const SESSION_REFRESHED: &str = "Sesión renovada";
const CLIENT_FETCHED: &str = "Información del cliente obtenida";

pub(crate) const NO_ACCESS_TOKEN: &str = "No hay token de acceso disponible";
const NO_REFRESH_TOKEN: &str = "No hay token de renovación disponible";

#[derive(Clone, Debug)]
pub struct AuthService {
    api: ApiClient,
    session: SessionStore,
}

impl AuthService {
    #[must_use]
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        Self { api, session }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub fn user_data(&self) -> Option<Value> {
        self.session.user_data()
    }

    /// Creates a client account. The account stays unverified until the email
    /// link is followed.
    #[instrument(skip_all)]
    pub async fn register(&self, registration: &Registration) -> FlowResult<Value> {
        let result = self
            .api
            .post(endpoints::REGISTER, registration, None)
            .await
            .map_err(FlowError::from);
        settle(result, REGISTERED, "Error al crear la cuenta")
    }

    /// Fetches the client owning the current session.
    #[instrument(skip_all)]
    pub async fn current_client(&self) -> FlowResult<Value> {
        settle(
            self.fetch_client().await,
            CLIENT_FETCHED,
            "Error al obtener información del cliente",
        )
    }

    async fn fetch_client(&self) -> Result<Value, FlowError> {
        let token = self.require_access_token()?;
        Ok(self
            .api
            .get(endpoints::GET_CLIENT, &[], Some(token.expose_secret()))
            .await?)
    }

    #[instrument(skip_all)]
    pub async fn resend_verification(&self, email: &str) -> FlowResult<Value> {
        let result = self
            .api
            .post(endpoints::RESEND_VERIFICATION, &EmailRequest { email }, None)
            .await
            .map_err(FlowError::from);
        settle(result, VERIFICATION_RESENT, "Error al reenviar verificación")
    }

    /// Activates an account with the token from the verification email. The
    /// token travels URL-encoded in the query string and the request has no body.
    #[instrument(skip_all)]
    pub async fn confirm_email(&self, token: &str) -> FlowResult<Value> {
        let encoded: String = form_urlencoded::byte_serialize(token.as_bytes()).collect();
        let endpoint = format!("{}?token={encoded}", endpoints::CONFIRM_EMAIL);
        let result = self
            .api
            .request(Method::POST, &endpoint, None, None)
            .await
            .map_err(FlowError::from);
        settle(result, EMAIL_CONFIRMED, "Error al verificar el email")
    }

    /// Accepts a user invitation and sets the invited user's password. The
    /// server's own message wins over the default one.
    #[instrument(skip_all)]
    pub async fn accept_invitation(&self, token: &str, password: &SecretString) -> FlowResult<Value> {
        let request = AcceptInvitationRequest { token, password };
        match self
            .api
            .post(endpoints::ACCEPT_INVITATION, &request, None)
            .await
        {
            Ok(data) => {
                let message = data
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or(INVITATION_ACCEPTED)
                    .to_string();
                Ok(FlowSuccess::new(message, data))
            }
            Err(err) => Err(auth_failure(err.into(), "Error al aceptar la invitación")),
        }
    }

    /// Exchanges credentials for tokens and stores the session. A success
    /// response without both tokens is rejected and nothing is stored.
    #[instrument(skip_all)]
    pub async fn login(&self, credentials: &Credentials) -> FlowResult<Session> {
        let result = self.try_login(credentials).await;
        if result.is_ok() {
            info!("session started");
        }
        settle(result, LOGGED_IN, "Error al iniciar sesión")
    }

    async fn try_login(&self, credentials: &Credentials) -> Result<Session, FlowError> {
        let data = self.api.post(endpoints::LOGIN, credentials, None).await?;
        let session = session_from(data).ok_or_else(|| {
            warn!("login response did not carry a usable token pair");
            FlowError::Local(String::new())
        })?;
        self.session.store(&session)?;
        Ok(session)
    }

    /// Clears the local session. No request is sent.
    pub fn logout(&self) -> FlowResult<()> {
        self.session.clear();
        info!("session closed");
        Ok(FlowSuccess::new(LOGGED_OUT, ()))
    }

    #[instrument(skip_all)]
    pub async fn forgot_password(&self, email: &str) -> FlowResult<Value> {
        let result = self
            .api
            .post(endpoints::FORGOT_PASSWORD, &EmailRequest { email }, None)
            .await
            .map_err(FlowError::from);
        settle(
            result,
            RESET_REQUESTED,
            "Error al solicitar recuperación de contraseña",
        )
    }

    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &SecretString,
    ) -> FlowResult<Value> {
        let request = ResetPasswordRequest {
            email,
            code,
            new_password,
        };
        let result = self
            .api
            .post(endpoints::RESET_PASSWORD, &request, None)
            .await
            .map_err(FlowError::from);
        settle(result, PASSWORD_RESET, "Error al restablecer la contraseña")
    }

    /// Trades the stored refresh token for a new token pair. Any failure clears
    /// the whole session.
    #[instrument(skip_all)]
    pub async fn refresh_token(&self) -> FlowResult<Session> {
        match self.try_refresh().await {
            Ok(session) => {
                debug!("session refreshed");
                Ok(FlowSuccess::new(SESSION_REFRESHED, session))
            }
            Err(err) => {
                warn!("token refresh failed, clearing session");
                self.session.clear();
                Err(auth_failure(err, "Sesión expirada"))
            }
        }
    }

    async fn try_refresh(&self) -> Result<Session, FlowError> {
        let refresh_token = self
            .session
            .refresh_token()
            .ok_or_else(|| FlowError::Local(NO_REFRESH_TOKEN.to_string()))?;
        let request = RefreshRequest {
            refresh_token: &refresh_token,
        };
        let data = self.api.post(endpoints::REFRESH_TOKEN, &request, None).await?;
        let session = session_from(data).ok_or_else(|| FlowError::Local(String::new()))?;
        self.session.store(&session)?;
        Ok(session)
    }

    fn require_access_token(&self) -> Result<SecretString, FlowError> {
        self.session
            .access_token()
            .filter(|token| is_valid_token(token.expose_secret()))
            .ok_or_else(|| FlowError::Local(NO_ACCESS_TOKEN.to_string()))
    }
}

fn session_from(data: Value) -> Option<Session> {
    serde_json::from_value::<TokenResponse>(data)
        .ok()?
        .into_session()
}

fn settle<T>(result: Result<T, FlowError>, success: &str, default_message: &str) -> FlowResult<T> {
    result
        .map(|data| FlowSuccess::new(success, data))
        .map_err(|err| auth_failure(err, default_message))
}
