//! Session state and its single-writer manager.
//!
//! The [`Session`] snapshot is plain data; `isAuthenticated` is derived
//! from it, never stored, so it cannot disagree with the fields it is
//! derived from. The [`SessionManager`] owns the snapshot behind a lock,
//! mirrors every mutation to the credential store (write-through), and
//! reports navigation side effects through a watch channel instead of
//! touching a router itself.

use std::sync::{Arc, Mutex};

use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::error::{ErrorCode, Result, SessionError};
use crate::guard::{self, RouteDecision};
use crate::models::{User, UserUpdate};
use crate::store::{CredentialStore, CredentialVault};

// ─── Session snapshot ───────────────────────────────────────────────

/// One observable session state.
///
/// `is_loading` is true only before the initial hydration finishes; the
/// per-action pending flags of callers (a submitting login form, an
/// in-flight list request) are a different concern and live with those
/// callers.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_loading: bool,
}

impl Session {
    /// The pre-hydration state every session starts in.
    pub fn loading() -> Self {
        Self {
            user: None,
            token: None,
            is_loading: true,
        }
    }

    pub fn logged_out() -> Self {
        Self {
            user: None,
            token: None,
            is_loading: false,
        }
    }

    pub fn authenticated(user: User, token: String) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
            is_loading: false,
        }
    }

    /// Derived: true iff both user and token are present.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}

// ─── Authenticated request headers ──────────────────────────────────

/// Headers every authenticated request carries: the bearer token plus
/// the JSON content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    authorization: String,
}

impl AuthHeaders {
    pub const CONTENT_TYPE: &'static str = "application/json";

    pub fn bearer(token: &str) -> Self {
        Self {
            authorization: format!("Bearer {token}"),
        }
    }

    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    pub fn content_type(&self) -> &'static str {
        Self::CONTENT_TYPE
    }

    /// Header name/value pairs, ready to copy onto a request.
    pub fn pairs(&self) -> [(&'static str, String); 2] {
        [
            ("Authorization", self.authorization.clone()),
            ("Content-Type", Self::CONTENT_TYPE.to_string()),
        ]
    }
}

// ─── Navigation signal ──────────────────────────────────────────────

/// Where the UI should go after a session transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// The sign-in screen, after logout.
    SignIn,
    /// The default landing screen.
    Landing,
    /// A location recorded by the route guard before it redirected.
    ReturnTo(String),
}

impl NavigationTarget {
    pub fn path(&self) -> &str {
        match self {
            Self::SignIn => "/signin",
            Self::Landing => "/",
            Self::ReturnTo(path) => path,
        }
    }
}

/// Post-transition navigation events.
///
/// The manager emits a target after a successful login and after logout;
/// subscribers drive their router from it. Only the latest target is
/// retained, which is what a router would keep anyway.
#[derive(Clone)]
pub struct NavigationSignal {
    sender: Arc<watch::Sender<Option<NavigationTarget>>>,
    receiver: watch::Receiver<Option<NavigationTarget>>,
}

impl NavigationSignal {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    pub fn emit(&self, target: NavigationTarget) {
        let _ = self.sender.send(Some(target));
    }

    /// Wait for the next emitted target.
    pub async fn next(&mut self) -> Option<NavigationTarget> {
        self.receiver.changed().await.ok()?;
        self.receiver.borrow_and_update().clone()
    }

    /// The most recently emitted target, if any.
    pub fn latest(&self) -> Option<NavigationTarget> {
        self.receiver.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<NavigationTarget>> {
        self.receiver.clone()
    }
}

impl Default for NavigationSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NavigationSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationSignal")
            .field("latest", &*self.receiver.borrow())
            .finish()
    }
}

// ─── Session broadcast ──────────────────────────────────────────────

/// Session-change notifications for consumers that re-render from
/// session state (the route guard, a header bar showing the user).
///
/// Carries no payload, just a bumped version; read the manager for the
/// current snapshot.
#[derive(Clone)]
pub struct SessionBroadcast {
    sender: Arc<watch::Sender<u64>>,
    receiver: watch::Receiver<u64>,
}

impl SessionBroadcast {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(0u64);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// Signal that the session changed. All receivers are notified.
    pub fn notify(&self) {
        let current = *self.sender.borrow();
        let _ = self.sender.send(current.wrapping_add(1));
    }

    /// Wait for the next change signal.
    pub async fn wait_for_update(&mut self) {
        let _ = self.receiver.changed().await;
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.receiver.clone()
    }
}

impl Default for SessionBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionBroadcast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBroadcast")
            .field("version", &*self.sender.borrow())
            .finish()
    }
}

// ─── Session manager ────────────────────────────────────────────────

/// The single writer for session state.
///
/// Construct one at startup and hand clones to every consumer; there is
/// no global. All mutation goes through these methods, and each
/// mutation is mirrored to the credential store before any navigation
/// is signaled, so a store read immediately after a navigation event
/// observes the new state.
///
/// Two logins racing each other are allowed; the last one to take the
/// write lock wins, state and store alike.
#[derive(Clone)]
pub struct SessionManager {
    state: Arc<RwLock<Session>>,
    vault: CredentialVault,
    broadcast: SessionBroadcast,
    navigation: NavigationSignal,
    return_to: Arc<Mutex<Option<String>>>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            state: Arc::new(RwLock::new(Session::loading())),
            vault: CredentialVault::new(store),
            broadcast: SessionBroadcast::new(),
            navigation: NavigationSignal::new(),
            return_to: Arc::new(Mutex::new(None)),
        }
    }

    /// The current snapshot.
    pub async fn current(&self) -> Session {
        self.state.read().await.clone()
    }

    pub fn broadcast(&self) -> &SessionBroadcast {
        &self.broadcast
    }

    pub fn navigation(&self) -> &NavigationSignal {
        &self.navigation
    }

    /// The location recorded by the last unauthenticated redirect, if a
    /// login has not consumed it yet.
    pub fn pending_return_to(&self) -> Option<String> {
        self.return_to.lock().unwrap().clone()
    }

    /// Hydrate from the credential store.
    ///
    /// This is the only path out of the initial loading state. Both
    /// entries present and parseable means authenticated; anything else
    /// wipes the store and lands logged out. Safe to run again, it just
    /// re-hydrates.
    pub async fn initialize(&self) -> Result<Session> {
        let (user, token) = self.vault.read().await?;
        let next = match (user, token) {
            (Some(user), Some(token)) => {
                info!(username = %user.username, "session hydrated from credential store");
                Session::authenticated(user, token)
            }
            (user, token) => {
                if user.is_some() || token.is_some() {
                    warn!("credential store held a partial pair, clearing");
                }
                self.vault.clear().await?;
                Session::logged_out()
            }
        };
        *self.state.write().await = next.clone();
        self.broadcast.notify();
        Ok(next)
    }

    /// Validate and install a new identity, write it through to the
    /// store, then signal navigation to the recorded return-to location
    /// or the landing page.
    ///
    /// A payload that is missing `id` or `username`, or an empty token,
    /// is rejected with no change to state or store.
    pub async fn login(&self, user: User, token: &str) -> Result<Session> {
        validate_login(&user, token)?;
        info!(username = %user.username, "login accepted");

        let next = Session::authenticated(user.clone(), token.to_string());
        *self.state.write().await = next.clone();
        self.vault.write(&user, token).await?;
        self.broadcast.notify();

        // The store write above must be complete before this fires.
        let target = self
            .take_return_to()
            .map(NavigationTarget::ReturnTo)
            .unwrap_or(NavigationTarget::Landing);
        self.navigation.emit(target);
        Ok(next)
    }

    /// Reset to logged out, clear the store, and signal navigation to
    /// the sign-in screen. Idempotent; clearing an empty store is
    /// harmless.
    pub async fn logout(&self) -> Result<Session> {
        {
            let state = self.state.read().await;
            if let Some(user) = &state.user {
                info!(username = %user.username, "logging out");
            }
        }
        *self.state.write().await = Session::logged_out();
        self.vault.clear().await?;
        self.take_return_to();
        self.broadcast.notify();
        self.navigation.emit(NavigationTarget::SignIn);
        Ok(Session::logged_out())
    }

    /// Shallow-merge a partial into the current user and rewrite the
    /// stored user entry; the token is untouched. On a logged-out
    /// session this is a no-op, not an error: updating a session that
    /// does not exist is meaningless.
    pub async fn update_user(&self, partial: UserUpdate) -> Result<Session> {
        let (snapshot, merged) = {
            let mut state = self.state.write().await;
            match state.user.as_mut() {
                Some(user) => {
                    partial.merge_into(user);
                    let merged = user.clone();
                    (state.clone(), Some(merged))
                }
                None => (state.clone(), None),
            }
        };

        let Some(user) = merged else {
            debug!("update_user on a logged-out session is a no-op");
            return Ok(snapshot);
        };

        self.vault.write_user(&user).await?;
        self.broadcast.notify();
        Ok(snapshot)
    }

    /// Headers for an authenticated request.
    ///
    /// Callers must fetch these per request rather than caching them; a
    /// later login can rotate the token underneath a cached copy.
    pub async fn auth_headers(&self) -> Result<AuthHeaders> {
        let state = self.state.read().await;
        match &state.token {
            Some(token) => Ok(AuthHeaders::bearer(token)),
            None => Err(SessionError::Unauthenticated),
        }
    }

    /// Route decision for `location`. When the answer is a redirect,
    /// the location is recorded so the next successful login can return
    /// to it.
    pub async fn guard(&self, location: &str) -> RouteDecision {
        let decision = guard::decide(&*self.state.read().await, location);
        if let RouteDecision::RedirectToSignIn { from } = &decision {
            debug!(from = %from, "unauthenticated, redirecting to sign-in");
            *self.return_to.lock().unwrap() = Some(from.clone());
        }
        decision
    }

    fn take_return_to(&self) -> Option<String> {
        self.return_to.lock().unwrap().take()
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish_non_exhaustive()
    }
}

fn validate_login(user: &User, token: &str) -> Result<()> {
    if user.id.trim().is_empty() {
        return Err(SessionError::InvalidLoginPayload(ErrorCode::MissingUserId));
    }
    if user.username.trim().is_empty() {
        return Err(SessionError::InvalidLoginPayload(ErrorCode::MissingUsername));
    }
    if token.trim().is_empty() {
        return Err(SessionError::InvalidLoginPayload(ErrorCode::EmptyToken));
    }
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_snapshot_states() {
        let loading = Session::loading();
        assert!(loading.is_loading);
        assert!(!loading.is_authenticated());

        let out = Session::logged_out();
        assert!(!out.is_loading);
        assert!(!out.is_authenticated());

        let auth = Session::authenticated(User::new("1", "ana", Role::Admin), "tok".into());
        assert!(!auth.is_loading);
        assert!(auth.is_authenticated());
        assert_eq!(auth.username(), Some("ana"));
    }

    #[test]
    fn test_auth_headers_pairs() {
        let headers = AuthHeaders::bearer("abc");
        assert_eq!(headers.authorization(), "Bearer abc");
        assert_eq!(headers.content_type(), "application/json");

        let pairs = headers.pairs();
        assert!(pairs.contains(&("Authorization", "Bearer abc".to_string())));
        assert!(pairs.contains(&("Content-Type", "application/json".to_string())));
    }

    #[test]
    fn test_navigation_target_paths() {
        assert_eq!(NavigationTarget::SignIn.path(), "/signin");
        assert_eq!(NavigationTarget::Landing.path(), "/");
        assert_eq!(
            NavigationTarget::ReturnTo("/pacientes".into()).path(),
            "/pacientes"
        );
    }

    #[test]
    fn test_validate_login_rejects() {
        let ok = User::new("1", "ana", Role::Admin);
        assert!(validate_login(&ok, "tok").is_ok());

        let no_id = User::new("", "ana", Role::Admin);
        assert_eq!(
            validate_login(&no_id, "tok").unwrap_err().code(),
            Some(ErrorCode::MissingUserId)
        );

        let no_username = User::new("1", "  ", Role::Admin);
        assert_eq!(
            validate_login(&no_username, "tok").unwrap_err().code(),
            Some(ErrorCode::MissingUsername)
        );

        assert_eq!(
            validate_login(&ok, "").unwrap_err().code(),
            Some(ErrorCode::EmptyToken)
        );
    }

    #[tokio::test]
    async fn test_session_broadcast() {
        let broadcast = SessionBroadcast::new();
        let mut rx = broadcast.subscribe();

        broadcast.notify();
        let _ = rx.changed().await;
        assert_eq!(*rx.borrow(), 1);

        broadcast.notify();
        let _ = rx.changed().await;
        assert_eq!(*rx.borrow(), 2);
    }

    #[tokio::test]
    async fn test_navigation_signal_delivers_latest() {
        let signal = NavigationSignal::new();
        assert_eq!(signal.latest(), None);

        let mut listener = signal.clone();
        signal.emit(NavigationTarget::Landing);
        assert_eq!(listener.next().await, Some(NavigationTarget::Landing));

        signal.emit(NavigationTarget::SignIn);
        assert_eq!(listener.next().await, Some(NavigationTarget::SignIn));
        assert_eq!(signal.latest(), Some(NavigationTarget::SignIn));
    }
}
