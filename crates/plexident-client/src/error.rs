//! Client error types.
//!
//! A closed taxonomy: every failure a caller can see is one of these
//! variants. Local precondition failures (no session token) are kept
//! apart from server rejections (401), because the caller handles them
//! differently; one is "sign in first", the other is "your session
//! expired".

use std::fmt;

use plexident_core::SessionError;

/// Default message for a 401 whose body carried no `detail`.
pub const SESSION_EXPIRED_MESSAGE: &str =
    "Sesión expirada. Por favor, vuelve a iniciar sesión.";

/// Default message for a 403 whose body carried no `detail`.
pub const FORBIDDEN_MESSAGE: &str = "No tienes permisos para realizar esta acción.";

/// Errors that can occur when using the Plexident client.
#[derive(Debug, Clone)]
pub enum ClientError {
    /// Network-level error (DNS, connection refused, timeout, TLS).
    Network(String),

    /// No session token; the request was never sent.
    NotAuthenticated,

    /// A login payload the session manager refused to install.
    InvalidPayload(String),

    /// The credential store failed underneath the session manager.
    Storage(String),

    /// 400 Bad Request.
    BadRequest { message: String },

    /// 401 Unauthorized. The token was sent but the server rejected it.
    Unauthorized { message: String },

    /// 403 Forbidden.
    Forbidden { message: String },

    /// 404 Not Found.
    NotFound { message: String },

    /// Any other non-success status.
    Server { status: u16, message: String },

    /// Failed to deserialize the response body.
    Deserialization(String),
}

impl ClientError {
    /// Create a network error from a reqwest error.
    pub fn network(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }

    /// The user-facing message.
    pub fn message(&self) -> &str {
        match self {
            Self::Network(msg) => msg,
            Self::NotAuthenticated => "No hay token de autenticación disponible",
            Self::InvalidPayload(msg) => msg,
            Self::Storage(msg) => msg,
            Self::BadRequest { message } => message,
            Self::Unauthorized { message } => message,
            Self::Forbidden { message } => message,
            Self::NotFound { message } => message,
            Self::Server { message, .. } => message,
            Self::Deserialization(msg) => msg,
        }
    }

    /// The HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True if the request never left because there was no session.
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }

    /// True if the server rejected the token (401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// True for network-level failures.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::NotAuthenticated => {
                write!(f, "Not authenticated: no session token available")
            }
            Self::InvalidPayload(msg) => write!(f, "Invalid login payload: {}", msg),
            Self::Storage(msg) => write!(f, "Credential storage error: {}", msg),
            Self::BadRequest { message } => write!(f, "Bad Request: {}", message),
            Self::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            Self::Forbidden { message } => write!(f, "Forbidden: {}", message),
            Self::NotFound { message } => write!(f, "Not Found: {}", message),
            Self::Server { status, message } => {
                write!(f, "Server Error ({}): {}", status, message)
            }
            Self::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<SessionError> for ClientError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Unauthenticated => Self::NotAuthenticated,
            SessionError::InvalidLoginPayload(code) => Self::InvalidPayload(code.to_string()),
            SessionError::Store(inner) => Self::Storage(inner.to_string()),
        }
    }
}
