//! # Plexident Client
//!
//! Typed async client for the Plexident clinic API.
//!
//! The client pairs a [`SessionManager`] with a `reqwest` client: the
//! manager owns who is signed in, the client turns that into
//! authenticated requests. Construct one at startup and hand clones to
//! whatever needs it; clones share the same session.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use plexident_client::{ClientOptions, PlexidentClient};
//! use plexident_core::FileCredentialStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PlexidentClient::new(
//!         ClientOptions {
//!             base_url: "http://localhost:8000".into(),
//!             ..Default::default()
//!         },
//!         Arc::new(FileCredentialStore::new()),
//!     );
//!
//!     // Pick up any stored session, then sign in if there is none.
//!     let session = client.initialize().await?;
//!     if !session.is_authenticated() {
//!         client.sign_in("asanchez", "secreta9").await?;
//!     }
//!
//!     let patients = client.list_patients().await?;
//!     println!("{} pacientes", patients.len());
//!     Ok(())
//! }
//! ```

mod error;
mod patients;
mod types;
mod users;

pub use error::*;
pub use types::*;

// Session types that appear in this crate's API surface.
pub use plexident_core::{
    CredentialStore, Patient, Role, Session, SessionManager, User, UserUpdate,
};

use std::sync::Arc;

use plexident_core::AuthHeaders;
use tracing::debug;

// ─── Client options ─────────────────────────────────────────────────

/// Configuration for the Plexident client.
///
/// There is no token option here; tokens live in the session manager
/// and rotate with each login.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the API server (e.g. `http://localhost:8000`).
    pub base_url: String,

    /// Base path for API endpoints (default: `/api`).
    pub base_path: String,

    /// HTTP request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            base_path: "/api".to_string(),
            timeout_secs: 30,
        }
    }
}

// ─── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for the clinic API.
///
/// Every request method fetches auth headers from the session at call
/// time, so a re-login mid-flight is picked up by the next request.
/// Methods other than [`sign_in`](Self::sign_in) fail with
/// [`ClientError::NotAuthenticated`] before touching the network when
/// no session is present.
#[derive(Clone)]
pub struct PlexidentClient {
    http: reqwest::Client,
    base_url: String,
    options: ClientOptions,
    session: SessionManager,
}

impl PlexidentClient {
    /// Create a client with a fresh session manager over `store`.
    pub fn new(options: ClientOptions, store: Arc<dyn CredentialStore>) -> Self {
        Self::with_session(options, SessionManager::new(store))
    }

    /// Create a client over an existing session manager, sharing its
    /// state with every other holder of that manager.
    pub fn with_session(options: ClientOptions, session: SessionManager) -> Self {
        let cookie_store = Arc::new(reqwest::cookie::Jar::default());

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static(AuthHeaders::CONTENT_TYPE),
        );

        let http = reqwest::Client::builder()
            .cookie_provider(cookie_store)
            .timeout(std::time::Duration::from_secs(options.timeout_secs))
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let base_url = format!(
            "{}{}",
            options.base_url.trim_end_matches('/'),
            options.base_path
        );

        Self {
            http,
            base_url,
            options,
            session,
        }
    }

    /// The session manager behind this client.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Get the options this client was created with.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// The full base URL (base_url + base_path).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ─── Internal helpers ───────────────────────────────────────────

    /// Build a full URL for the given endpoint path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send an authenticated GET and deserialize the response.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let headers = self.session.auth_headers().await?;
        let resp = self
            .http
            .get(self.url(path))
            .header(reqwest::header::AUTHORIZATION, headers.authorization())
            .send()
            .await
            .map_err(ClientError::network)?;

        Self::handle_response(resp).await
    }

    /// Send an authenticated POST with a JSON body.
    pub(crate) async fn post<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let headers = self.session.auth_headers().await?;
        let resp = self
            .http
            .post(self.url(path))
            .header(reqwest::header::AUTHORIZATION, headers.authorization())
            .json(body)
            .send()
            .await
            .map_err(ClientError::network)?;

        Self::handle_response(resp).await
    }

    /// Send an authenticated PUT with a JSON body.
    pub(crate) async fn put<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let headers = self.session.auth_headers().await?;
        let resp = self
            .http
            .put(self.url(path))
            .header(reqwest::header::AUTHORIZATION, headers.authorization())
            .json(body)
            .send()
            .await
            .map_err(ClientError::network)?;

        Self::handle_response(resp).await
    }

    /// Send an authenticated DELETE. The API answers these with an
    /// empty body.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let headers = self.session.auth_headers().await?;
        let resp = self
            .http
            .delete(self.url(path))
            .header(reqwest::header::AUTHORIZATION, headers.authorization())
            .send()
            .await
            .map_err(ClientError::network)?;

        Self::handle_response(resp).await
    }

    /// POST without a session. Only the login endpoint uses this.
    async fn post_public<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(ClientError::network)?;

        Self::handle_response(resp).await
    }

    /// GET with an explicit token, for the window during sign-in where
    /// the token exists but the session is not installed yet.
    async fn get_with_token<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Result<T, ClientError> {
        let headers = AuthHeaders::bearer(token);
        let resp = self
            .http
            .get(self.url(path))
            .header(reqwest::header::AUTHORIZATION, headers.authorization())
            .send()
            .await
            .map_err(ClientError::network)?;

        Self::handle_response(resp).await
    }

    /// Handle an HTTP response, mapping status codes to errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();

        if status.is_success() {
            let body = resp.text().await.map_err(ClientError::network)?;
            if body.is_empty() {
                // Deletes come back bodiless; let unit decode from null.
                return serde_json::from_str("null")
                    .map_err(|e| ClientError::Deserialization(format!("Empty response: {}", e)));
            }
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                ClientError::Deserialization(format!(
                    "Failed to deserialize response: {} (body: {})",
                    e, preview
                ))
            })
        } else {
            let body = resp.text().await.unwrap_or_default();

            // Django REST error bodies carry a `detail` string.
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("detail")?.as_str().map(str::to_string));

            match status.as_u16() {
                400 => Err(ClientError::BadRequest {
                    message: detail.unwrap_or(body),
                }),
                401 => Err(ClientError::Unauthorized {
                    message: detail.unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
                }),
                403 => Err(ClientError::Forbidden {
                    message: detail.unwrap_or_else(|| FORBIDDEN_MESSAGE.to_string()),
                }),
                404 => Err(ClientError::NotFound {
                    message: detail.unwrap_or_else(|| "Recurso no encontrado".into()),
                }),
                _ => Err(ClientError::Server {
                    status: status.as_u16(),
                    message: detail.unwrap_or(body),
                }),
            }
        }
    }

    // ─── Authentication ─────────────────────────────────────────────

    /// Hydrate the session from the credential store.
    pub async fn initialize(&self) -> Result<Session, ClientError> {
        Ok(self.session.initialize().await?)
    }

    /// Sign in with username and password.
    ///
    /// Exchanges the credentials for a token pair, fetches the account
    /// record with the fresh access token, then installs both in the
    /// session. The session persists the credentials and signals
    /// navigation; by the time this returns, a restart would come back
    /// signed in.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Session, ClientError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let tokens: TokenPair = self.post_public("/auth/login/", &body).await?;
        debug!(has_refresh = !tokens.refresh.is_empty(), "token pair received");

        let user: User = self.get_with_token("/users/me/", &tokens.access).await?;
        Ok(self.session.login(user, &tokens.access).await?)
    }

    /// Sign out: clear the session and stored credentials. Local only;
    /// the server holds no session to revoke, the token just expires.
    pub async fn sign_out(&self) -> Result<Session, ClientError> {
        Ok(self.session.logout().await?)
    }

    /// The signed-in user's own record, fetched fresh. `GET /users/me/`.
    pub async fn me(&self) -> Result<User, ClientError> {
        self.get("/users/me/").await
    }

    /// Merge a partial into the signed-in user, locally and in the
    /// credential store. Pair with [`update_user`](Self::update_user)
    /// when the change should also persist on the server.
    pub async fn update_profile(&self, update: UserUpdate) -> Result<Session, ClientError> {
        Ok(self.session.update_user(update).await?)
    }
}

impl std::fmt::Debug for PlexidentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlexidentClient")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
