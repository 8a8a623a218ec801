//! Remote auth API gateway.
//!
//! [`AuthApi`] is the trait seam the session store depends on;
//! [`AuthGateway`] is the production implementation over `reqwest`.
//! All calls are made with credentials (cookies) included and the
//! configured timeout (30 s by default). Authenticated endpoints also
//! carry the installed credential token as a bearer header — the
//! cookie jar is in-memory only, so the bearer credential is what lets
//! a fresh process resume a persisted session.

use crate::ClientConfig;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors from gateway calls.
///
/// The session store catches every one of these and translates it
/// into a cleared session; nothing here reaches UI callers as an
/// exception.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure (DNS, connect, TLS, timeout, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected status {status} from {endpoint}")]
    Status {
        /// The endpoint path that failed.
        endpoint: &'static str,
        /// HTTP status code.
        status: u16,
    },
}

impl GatewayError {
    /// Coarse classification for logs: "timeout", "connect", "status"
    /// or "network".
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(e) if e.is_timeout() => "timeout",
            Self::Transport(e) if e.is_connect() => "connect",
            Self::Transport(_) => "network",
            Self::Status { .. } => "status",
        }
    }
}

/// Credentials for `POST /Authentication/sign-in`.
#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest {
    /// Account email.
    pub email: String,
    /// Plain-text password; sent over TLS, never stored.
    pub password: String,
}

/// Response of a successful sign-in: the credential token the session
/// is built from.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    /// The opaque credential token.
    #[serde(alias = "accessToken", alias = "credential")]
    pub token: String,
}

/// Payload for `POST /Authentication/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Account email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Plain-text password; sent over TLS, never stored.
    pub password: String,
}

/// Profile returned by `GET /Authentication/me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    /// Server-side user identifier.
    pub id: String,
    /// Account email.
    pub email: String,
    /// Display name.
    #[serde(alias = "fullName")]
    pub name: String,
    /// Avatar URL, when set.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Account status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Remote auth operations the session store depends on.
///
/// Implementations must be thread-safe (`Send + Sync`) so a store can
/// be shared across tasks. Tests supply in-memory fakes; production
/// uses [`AuthGateway`].
pub trait AuthApi: Send + Sync {
    /// Installs (or clears) the credential token attached to
    /// authenticated calls.
    ///
    /// The session store drives this on login, rehydration and logout;
    /// without it a fresh process would send every authenticated call
    /// bare and the server would reject the persisted session.
    fn set_credential(&self, token: Option<String>);

    /// Exchanges credentials for a credential token.
    fn sign_in(
        &self,
        request: &SignInRequest,
    ) -> impl Future<Output = Result<SignInResponse, GatewayError>> + Send;

    /// Creates a new account.
    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Invalidates the server-side session.
    fn logout(&self) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Confirmation probe: does the server still accept our cookie?
    ///
    /// `Ok(false)` means the server answered and rejected the session;
    /// `Err` means we could not ask.
    fn session_check(&self) -> impl Future<Output = Result<bool, GatewayError>> + Send;

    /// Fetches the current profile (used after the external sign-in
    /// redirect flow, where no token passes through the client).
    fn me(&self) -> impl Future<Output = Result<UserProfile, GatewayError>> + Send;

    /// Requests an email-verification mail for the current account.
    fn request_email_verification(
        &self,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Confirms an email address with the mailed token.
    fn verify_email(&self, token: &str) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Completes the Google sign-in redirect flow.
    fn google_callback(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<SignInResponse, GatewayError>> + Send;
}

/// Production [`AuthApi`] over HTTP.
///
/// The underlying client keeps a cookie store, so the session cookie
/// set by sign-in rides along on every later call.
#[derive(Debug, Clone)]
pub struct AuthGateway {
    http: reqwest::Client,
    base_url: String,
    credential: Arc<RwLock<Option<String>>>,
}

impl AuthGateway {
    /// Builds a gateway from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] if the HTTP client cannot
    /// be constructed (TLS backend failure).
    pub fn new(config: &ClientConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            credential: Arc::new(RwLock::new(None)),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attaches the installed credential as a bearer header, if any.
    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.credential.read().as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Maps a non-success response to [`GatewayError::Status`].
    fn ensure_success(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(GatewayError::Status {
                endpoint,
                status: status.as_u16(),
            })
        }
    }
}

impl AuthApi for AuthGateway {
    fn set_credential(&self, token: Option<String>) {
        *self.credential.write() = token;
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<SignInResponse, GatewayError> {
        debug!(email = %request.email, "sign-in request");
        let response = self
            .http
            .post(self.url("/Authentication/sign-in"))
            .json(request)
            .send()
            .await?;
        let response = Self::ensure_success("/Authentication/sign-in", response)?;
        Ok(response.json().await?)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), GatewayError> {
        let response = self
            .http
            .post(self.url("/Authentication/register"))
            .json(request)
            .send()
            .await?;
        Self::ensure_success("/Authentication/register", response)?;
        Ok(())
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        let response = self
            .authorized(self.http.post(self.url("/Authentication/logout")))
            .send()
            .await?;
        Self::ensure_success("/Authentication/logout", response)?;
        Ok(())
    }

    async fn session_check(&self) -> Result<bool, GatewayError> {
        let response = self
            .authorized(self.http.get(self.url("/Authentication/me")))
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    async fn me(&self) -> Result<UserProfile, GatewayError> {
        let response = self
            .authorized(self.http.get(self.url("/Authentication/me")))
            .send()
            .await?;
        let response = Self::ensure_success("/Authentication/me", response)?;
        Ok(response.json().await?)
    }

    async fn request_email_verification(&self) -> Result<(), GatewayError> {
        let response = self
            .authorized(self.http.get(self.url("/Authentication/email-verification")))
            .send()
            .await?;
        Self::ensure_success("/Authentication/email-verification", response)?;
        Ok(())
    }

    async fn verify_email(&self, token: &str) -> Result<(), GatewayError> {
        let response = self
            .authorized(self.http.get(self.url("/Authentication/verify-email")))
            .query(&[("v", token)])
            .send()
            .await?;
        Self::ensure_success("/Authentication/verify-email", response)?;
        Ok(())
    }

    async fn google_callback(&self, code: &str) -> Result<SignInResponse, GatewayError> {
        let response = self
            .http
            .get(self.url("/Authentication/google-callback"))
            .query(&[("code", code)])
            .send()
            .await?;
        let response = Self::ensure_success("/Authentication/google-callback", response)?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigLoader;

    fn local_gateway(port: u16) -> AuthGateway {
        let mut config = ConfigLoader::new()
            .skip_global_config()
            .skip_env_vars()
            .load()
            .unwrap();
        config.base_url = format!("http://127.0.0.1:{port}");
        config.timeout_secs = 2;
        AuthGateway::new(&config).unwrap()
    }

    #[test]
    fn url_joins_base_and_path() {
        let gateway = local_gateway(8080);
        assert_eq!(
            gateway.url("/Authentication/sign-in"),
            "http://127.0.0.1:8080/Authentication/sign-in"
        );
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        // Port 1 is very unlikely to be open
        let gateway = local_gateway(1);
        let result = gateway.logout().await;

        let err = result.expect_err("expected connection failure");
        assert!(
            matches!(err, GatewayError::Transport(_)),
            "expected transport error, got: {err}"
        );
        assert!(
            err.kind() == "connect" || err.kind() == "network" || err.kind() == "timeout",
            "unexpected kind: {}",
            err.kind()
        );
    }

    #[tokio::test]
    async fn session_check_propagates_transport_errors() {
        let gateway = local_gateway(1);
        assert!(gateway.session_check().await.is_err());
    }

    #[test]
    fn set_credential_installs_and_clears() {
        let gateway = local_gateway(8080);
        assert!(gateway.credential.read().is_none());

        gateway.set_credential(Some("tok-1".into()));
        assert_eq!(gateway.credential.read().as_deref(), Some("tok-1"));

        gateway.set_credential(None);
        assert!(gateway.credential.read().is_none());
    }

    #[test]
    fn status_error_kind_and_display() {
        let err = GatewayError::Status {
            endpoint: "/Authentication/logout",
            status: 401,
        };
        assert_eq!(err.kind(), "status");
        let msg = err.to_string();
        assert!(msg.contains("401"), "got: {msg}");
        assert!(msg.contains("/Authentication/logout"), "got: {msg}");
    }

    #[test]
    fn sign_in_response_accepts_aliases() {
        let response: SignInResponse =
            serde_json::from_str(r#"{"accessToken": "tok-1"}"#).unwrap();
        assert_eq!(response.token, "tok-1");

        let response: SignInResponse = serde_json::from_str(r#"{"token": "tok-2"}"#).unwrap();
        assert_eq!(response.token, "tok-2");
    }
}
