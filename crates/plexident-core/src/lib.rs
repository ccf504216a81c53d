//! # Plexident Core
//!
//! Client-side session and credential management for the Plexident
//! dental-clinic admin system. This crate holds the pieces every other
//! consumer depends on:
//!
//! - [`SessionManager`] — the single writer for `{user, token}` state,
//!   hydrated once from a [`CredentialStore`] and mirrored back on every
//!   mutation (write-through).
//! - [`CredentialStore`] — pluggable key/value persistence (in-memory for
//!   tests, a JSON file under `~/.plexident/` for the CLI).
//! - [`guard`] — the three-state route decision (loading / redirect to
//!   sign-in / render) driven purely by session snapshots.
//! - [`models`] — the `User`, `Role`, and `Patient` records shared with
//!   the HTTP client.
//!
//! The manager is an explicitly owned context object: construct it, pass
//! it to whoever needs it. There is no global. Navigation after login and
//! logout is reported through a watch channel ([`NavigationSignal`]) so
//! the state machine stays testable without a router.

pub mod env;
pub mod error;
pub mod guard;
pub mod models;
pub mod session;
pub mod store;
pub mod utils;
pub mod validate;

// Re-exports for convenience
pub use error::{ErrorCode, SessionError};
pub use guard::RouteDecision;
pub use models::{Patient, Role, User, UserUpdate};
pub use session::{
    AuthHeaders, NavigationSignal, NavigationTarget, Session, SessionBroadcast, SessionManager,
};
pub use store::{
    CredentialStore, CredentialStoreError, CredentialVault, FileCredentialStore,
    MemoryCredentialStore, TOKEN_KEY, USER_KEY,
};
