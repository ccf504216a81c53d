//! Session manager integration tests.
//!
//! Covers: hydration from the credential store, login and its rejection
//! paths, logout, partial user updates, auth headers, the route guard
//! with return-to, write-through ordering, and store failures.

use std::sync::Arc;

use async_trait::async_trait;
use plexident_core::{
    CredentialStore, CredentialStoreError, ErrorCode, MemoryCredentialStore, NavigationTarget,
    Role, RouteDecision, Session, SessionError, SessionManager, User, UserUpdate, TOKEN_KEY,
    USER_KEY,
};

fn fixture_user(id: &str, username: &str) -> User {
    User {
        nombres: "Ana".into(),
        apellidos: "Sánchez".into(),
        correo: "ana@clinica.com".into(),
        telefono: Some("3001234567".into()),
        ..User::new(id, username, Role::Odontologo)
    }
}

fn assert_derived(session: &Session) {
    assert_eq!(
        session.is_authenticated(),
        session.user.is_some() && session.token.is_some()
    );
}

fn manager() -> (Arc<MemoryCredentialStore>, SessionManager) {
    let store = Arc::new(MemoryCredentialStore::new());
    let manager = SessionManager::new(store.clone());
    (store, manager)
}

// ── Hydration ───────────────────────────────────────────────────

#[tokio::test]
async fn starts_loading_until_initialized() {
    let (_, manager) = manager();
    let session = manager.current().await;
    assert!(session.is_loading);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn initialize_empty_store_lands_logged_out() {
    let (_, manager) = manager();
    let session = manager.initialize().await.unwrap();
    assert!(!session.is_loading);
    assert!(!session.is_authenticated());
    assert_derived(&session);
}

#[tokio::test]
async fn initialize_hydrates_stored_credentials() {
    let (store, manager) = manager();
    let user = fixture_user("7", "asanchez");
    let raw = serde_json::to_string(&user).unwrap();
    store.set(USER_KEY, &raw).await.unwrap();
    store.set(TOKEN_KEY, "tok-77").await.unwrap();

    let session = manager.initialize().await.unwrap();
    assert!(session.is_authenticated());
    assert_eq!(session.username(), Some("asanchez"));
    assert_eq!(session.token.as_deref(), Some("tok-77"));
}

#[tokio::test]
async fn initialize_is_repeatable() {
    let (store, manager) = manager();
    let user = fixture_user("7", "asanchez");
    store
        .set(USER_KEY, &serde_json::to_string(&user).unwrap())
        .await
        .unwrap();
    store.set(TOKEN_KEY, "tok-77").await.unwrap();

    let first = manager.initialize().await.unwrap();
    let second = manager.initialize().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn initialize_wipes_token_without_user() {
    let (store, manager) = manager();
    store.set(TOKEN_KEY, "orphan-token").await.unwrap();

    let session = manager.initialize().await.unwrap();
    assert!(!session.is_authenticated());
    assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn initialize_wipes_user_without_token() {
    let (store, manager) = manager();
    let user = fixture_user("7", "asanchez");
    store
        .set(USER_KEY, &serde_json::to_string(&user).unwrap())
        .await
        .unwrap();

    let session = manager.initialize().await.unwrap();
    assert!(!session.is_authenticated());
    assert_eq!(store.get(USER_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn initialize_recovers_from_corrupt_user_entry() {
    let (store, manager) = manager();
    // Valid JSON but not a valid user record: `rol` is missing.
    let raw = r#"{"id":"7","nombres":"Ana","apellidos":"Sánchez","username":"asanchez","correo":"ana@clinica.com"}"#;
    store.set(USER_KEY, raw).await.unwrap();
    store.set(TOKEN_KEY, "tok-77").await.unwrap();

    let session = manager.initialize().await.unwrap();
    assert!(!session.is_authenticated());
    assert_eq!(store.get(USER_KEY).await.unwrap(), None);
    assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
}

// ── Login ───────────────────────────────────────────────────────

#[tokio::test]
async fn login_installs_identity_and_writes_store() {
    let (store, manager) = manager();
    manager.initialize().await.unwrap();

    let session = manager
        .login(fixture_user("7", "asanchez"), "tok-77")
        .await
        .unwrap();
    assert!(session.is_authenticated());
    assert_derived(&session);

    let stored_user: User =
        serde_json::from_str(&store.get(USER_KEY).await.unwrap().unwrap()).unwrap();
    assert_eq!(stored_user.username, "asanchez");
    assert_eq!(store.get(TOKEN_KEY).await.unwrap().as_deref(), Some("tok-77"));
    assert_eq!(
        manager.navigation().latest(),
        Some(NavigationTarget::Landing)
    );
}

#[tokio::test]
async fn login_rejects_missing_id() {
    let (store, manager) = manager();
    manager.initialize().await.unwrap();
    let before = manager.current().await;

    let err = manager
        .login(fixture_user("", "asanchez"), "tok-77")
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::MissingUserId));

    // Neither state nor store moved, and nothing was navigated.
    assert_eq!(manager.current().await, before);
    assert_eq!(store.get(USER_KEY).await.unwrap(), None);
    assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
    assert_eq!(manager.navigation().latest(), None);
}

#[tokio::test]
async fn login_rejects_missing_username() {
    let (_, manager) = manager();
    manager.initialize().await.unwrap();

    let err = manager
        .login(fixture_user("7", "   "), "tok-77")
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::MissingUsername));
    assert!(!manager.current().await.is_authenticated());
}

#[tokio::test]
async fn login_rejects_empty_token() {
    let (store, manager) = manager();
    manager.initialize().await.unwrap();

    let err = manager
        .login(fixture_user("7", "asanchez"), "")
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::EmptyToken));
    assert!(!manager.current().await.is_authenticated());
    assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn relogin_replaces_previous_identity() {
    let (store, manager) = manager();
    manager.initialize().await.unwrap();

    manager
        .login(fixture_user("7", "asanchez"), "tok-77")
        .await
        .unwrap();
    manager
        .login(fixture_user("9", "crojas"), "tok-99")
        .await
        .unwrap();

    let session = manager.current().await;
    assert_eq!(session.username(), Some("crojas"));
    assert_eq!(store.get(TOKEN_KEY).await.unwrap().as_deref(), Some("tok-99"));
}

// ── Logout ──────────────────────────────────────────────────────

#[tokio::test]
async fn logout_clears_state_and_store() {
    let (store, manager) = manager();
    manager.initialize().await.unwrap();
    manager
        .login(fixture_user("7", "asanchez"), "tok-77")
        .await
        .unwrap();

    let session = manager.logout().await.unwrap();
    assert!(!session.is_authenticated());
    assert_derived(&session);
    assert_eq!(store.get(USER_KEY).await.unwrap(), None);
    assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
    assert_eq!(manager.navigation().latest(), Some(NavigationTarget::SignIn));
}

#[tokio::test]
async fn logout_when_logged_out_is_harmless() {
    let (_, manager) = manager();
    manager.initialize().await.unwrap();

    let first = manager.logout().await.unwrap();
    let second = manager.logout().await.unwrap();
    assert_eq!(first, second);
    assert!(!second.is_authenticated());
}

// ── Update user ─────────────────────────────────────────────────

#[tokio::test]
async fn update_user_merges_and_persists() {
    let (store, manager) = manager();
    manager.initialize().await.unwrap();
    manager
        .login(fixture_user("7", "asanchez"), "tok-77")
        .await
        .unwrap();

    let session = manager
        .update_user(UserUpdate {
            telefono: Some("3119876543".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let user = session.user.unwrap();
    assert_eq!(user.telefono.as_deref(), Some("3119876543"));
    assert_eq!(user.nombres, "Ana");

    let stored_user: User =
        serde_json::from_str(&store.get(USER_KEY).await.unwrap().unwrap()).unwrap();
    assert_eq!(stored_user.telefono.as_deref(), Some("3119876543"));
    // Token survives a user-only rewrite.
    assert_eq!(store.get(TOKEN_KEY).await.unwrap().as_deref(), Some("tok-77"));
}

#[tokio::test]
async fn update_user_logged_out_is_noop() {
    let (store, manager) = manager();
    manager.initialize().await.unwrap();

    let session = manager
        .update_user(UserUpdate {
            nombres: Some("Nadie".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(session.user.is_none());
    assert_eq!(store.get(USER_KEY).await.unwrap(), None);
}

// ── Auth headers ────────────────────────────────────────────────

#[tokio::test]
async fn auth_headers_carry_bearer_token() {
    let (_, manager) = manager();
    manager.initialize().await.unwrap();
    manager
        .login(fixture_user("7", "asanchez"), "abc")
        .await
        .unwrap();

    let headers = manager.auth_headers().await.unwrap();
    assert_eq!(headers.authorization(), "Bearer abc");
    assert_eq!(headers.content_type(), "application/json");
}

#[tokio::test]
async fn auth_headers_require_a_session() {
    let (_, manager) = manager();
    manager.initialize().await.unwrap();

    let err = manager.auth_headers().await.unwrap_err();
    assert!(err.is_unauthenticated());
}

// ── Route guard and return-to ───────────────────────────────────

#[tokio::test]
async fn guard_waits_while_loading() {
    let (_, manager) = manager();
    assert_eq!(manager.guard("/agenda").await, RouteDecision::Loading);
    // A loading bounce must not record a return-to location.
    assert_eq!(manager.pending_return_to(), None);
}

#[tokio::test]
async fn guard_redirects_and_records_location() {
    let (_, manager) = manager();
    manager.initialize().await.unwrap();

    let decision = manager.guard("/pacientes/42").await;
    assert_eq!(
        decision,
        RouteDecision::RedirectToSignIn {
            from: "/pacientes/42".into()
        }
    );
    assert_eq!(manager.pending_return_to().as_deref(), Some("/pacientes/42"));
}

#[tokio::test]
async fn guard_renders_when_authenticated() {
    let (_, manager) = manager();
    manager.initialize().await.unwrap();
    manager
        .login(fixture_user("7", "asanchez"), "tok-77")
        .await
        .unwrap();

    assert_eq!(manager.guard("/agenda").await, RouteDecision::Render);
}

#[tokio::test]
async fn login_returns_to_guarded_location_once() {
    let (_, manager) = manager();
    manager.initialize().await.unwrap();
    manager.guard("/pacientes/42").await;

    manager
        .login(fixture_user("7", "asanchez"), "tok-77")
        .await
        .unwrap();
    assert_eq!(
        manager.navigation().latest(),
        Some(NavigationTarget::ReturnTo("/pacientes/42".into()))
    );
    assert_eq!(manager.pending_return_to(), None);

    // The recorded location is consumed; the next login lands home.
    manager.logout().await.unwrap();
    manager
        .login(fixture_user("7", "asanchez"), "tok-78")
        .await
        .unwrap();
    assert_eq!(
        manager.navigation().latest(),
        Some(NavigationTarget::Landing)
    );
}

#[tokio::test]
async fn logout_discards_pending_return_to() {
    let (_, manager) = manager();
    manager.initialize().await.unwrap();
    manager.guard("/pacientes/42").await;

    manager.logout().await.unwrap();
    assert_eq!(manager.pending_return_to(), None);
}

// ── Write-through ordering ──────────────────────────────────────

#[tokio::test]
async fn store_write_completes_before_navigation() {
    let (store, manager) = manager();
    manager.initialize().await.unwrap();

    // An observer that reads the store the instant navigation fires.
    let mut navigation = manager.navigation().clone();
    let raw = store.clone();
    let observer = tokio::spawn(async move {
        let target = navigation.next().await;
        let user = raw.get(USER_KEY).await.unwrap();
        let token = raw.get(TOKEN_KEY).await.unwrap();
        (target, user, token)
    });

    manager
        .login(fixture_user("7", "asanchez"), "tok-77")
        .await
        .unwrap();

    let (target, user, token) = observer.await.unwrap();
    assert_eq!(target, Some(NavigationTarget::Landing));
    assert!(user.is_some());
    assert_eq!(token.as_deref(), Some("tok-77"));
}

#[tokio::test]
async fn broadcast_fires_on_every_transition() {
    let (_, manager) = manager();
    let mut rx = manager.broadcast().subscribe();

    manager.initialize().await.unwrap();
    assert!(rx.has_changed().unwrap());
    rx.borrow_and_update();

    manager
        .login(fixture_user("7", "asanchez"), "tok-77")
        .await
        .unwrap();
    assert!(rx.has_changed().unwrap());
    rx.borrow_and_update();

    manager.logout().await.unwrap();
    assert!(rx.has_changed().unwrap());
}

// ── Store failures ──────────────────────────────────────────────

#[derive(Debug)]
struct FailingStore;

#[async_trait]
impl CredentialStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CredentialStoreError> {
        Err(CredentialStoreError::OperationFailed("backend offline".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), CredentialStoreError> {
        Err(CredentialStoreError::OperationFailed("backend offline".into()))
    }

    async fn delete(&self, _key: &str) -> Result<(), CredentialStoreError> {
        Err(CredentialStoreError::OperationFailed("backend offline".into()))
    }
}

#[tokio::test]
async fn initialize_surfaces_store_failure() {
    let manager = SessionManager::new(Arc::new(FailingStore));
    let err = manager.initialize().await.unwrap_err();
    assert!(matches!(err, SessionError::Store(_)));
    // Hydration never finished, so the session is still loading.
    assert!(manager.current().await.is_loading);
}

#[tokio::test]
async fn login_surfaces_store_failure_without_navigating() {
    let manager = SessionManager::new(Arc::new(FailingStore));
    let err = manager
        .login(fixture_user("7", "asanchez"), "tok-77")
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Store(_)));
    assert_eq!(manager.navigation().latest(), None);
}

// ── End to end ──────────────────────────────────────────────────

#[tokio::test]
async fn full_session_lifecycle() {
    let store = Arc::new(MemoryCredentialStore::new());

    // Fresh start: nothing stored, guard bounces to sign-in.
    let manager = SessionManager::new(store.clone());
    let session = manager.initialize().await.unwrap();
    assert_derived(&session);
    manager.guard("/agenda").await;

    // Login returns to the guarded page and persists credentials.
    let session = manager
        .login(fixture_user("7", "asanchez"), "tok-77")
        .await
        .unwrap();
    assert_derived(&session);
    assert_eq!(
        manager.navigation().latest(),
        Some(NavigationTarget::ReturnTo("/agenda".into()))
    );

    // A second manager over the same store picks the session up, the
    // way a page reload does.
    let reloaded = SessionManager::new(store.clone());
    let session = reloaded.initialize().await.unwrap();
    assert!(session.is_authenticated());
    assert_eq!(session.username(), Some("asanchez"));
    assert_eq!(reloaded.guard("/agenda").await, RouteDecision::Render);

    // Logout on the reloaded manager clears everything for both.
    reloaded.logout().await.unwrap();
    assert_eq!(store.get(USER_KEY).await.unwrap(), None);
    let session = manager.initialize().await.unwrap();
    assert!(!session.is_authenticated());
    assert_derived(&session);
}
