// Error types for the session core.
//
// The credential-store error lives next to the store trait in `store`;
// this module holds the session-level taxonomy and the reject codes for
// login payload validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::CredentialStoreError;

/// Reject codes for login payload validation.
///
/// A login is refused, with no state change, when the supplied user is
/// missing an identity field or the token is empty. The `rol` field is
/// typed ([`crate::models::Role`]), so its absence is caught earlier, at
/// the deserialization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingUserId,
    MissingUsername,
    EmptyToken,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::MissingUserId => "User id is required",
            Self::MissingUsername => "Username is required",
            Self::EmptyToken => "Token must not be empty",
        };
        write!(f, "{msg}")
    }
}

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The login payload failed validation; the session was left untouched.
    #[error("Invalid login payload: {0}")]
    InvalidLoginPayload(ErrorCode),

    /// No token is present; authenticated headers cannot be built.
    #[error("No authentication token available")]
    Unauthenticated,

    /// The credential store failed underneath a session operation.
    #[error(transparent)]
    Store(#[from] CredentialStoreError),
}

impl SessionError {
    /// The reject code, when this is a payload-validation failure.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::InvalidLoginPayload(code) => Some(*code),
            _ => None,
        }
    }

    /// Returns `true` if this is the missing-token precondition failure.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }
}

/// Unified result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
