// Credential persistence.
//
// A `CredentialStore` is a plain key/value store surviving restarts; it
// holds exactly two entries, the serialized user and the raw token.
// `CredentialVault` is the typed layer on top, and it is the only place
// that reads or writes those keys. Last writer wins; no retries.

mod file;
mod memory;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::models::User;

/// Store key for the JSON-serialized user record.
pub const USER_KEY: &str = "plexident_user";

/// Store key for the raw bearer token.
pub const TOKEN_KEY: &str = "plexident_access_token";

/// A durable key/value backend for credentials.
///
/// Implementations must tolerate deletes of absent keys (a no-op) and
/// overwrite on set.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug {
    /// Get a value by key. Returns `None` if the key doesn't exist.
    async fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError>;

    /// Set a key-value pair, overwriting any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), CredentialStoreError>;

    /// Delete a key. Deleting an absent key is harmless.
    async fn delete(&self, key: &str) -> Result<(), CredentialStoreError>;
}

/// Errors from credential store operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    #[error("Credential store operation failed: {0}")]
    OperationFailed(String),

    #[error("Credential store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Credential serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Typed access to the two credential entries.
///
/// All reads and writes of [`USER_KEY`] and [`TOKEN_KEY`] go through
/// here so the in-memory session and the store cannot drift apart.
#[derive(Debug, Clone)]
pub struct CredentialVault {
    store: Arc<dyn CredentialStore>,
}

impl CredentialVault {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Read both entries.
    ///
    /// A user entry that fails to deserialize is treated as a total
    /// miss: both keys are wiped and `(None, None)` returned. This never
    /// yields a half-valid pair out of corrupt data.
    pub async fn read(&self) -> Result<(Option<User>, Option<String>), CredentialStoreError> {
        let token = self.store.get(TOKEN_KEY).await?;
        let user = match self.store.get(USER_KEY).await? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!(error = %err, "stored user entry is corrupt, clearing credentials");
                    self.clear().await?;
                    return Ok((None, None));
                }
            },
            None => None,
        };
        Ok((user, token))
    }

    /// Overwrite both entries.
    pub async fn write(&self, user: &User, token: &str) -> Result<(), CredentialStoreError> {
        let raw = serde_json::to_string(user)?;
        self.store.set(USER_KEY, &raw).await?;
        self.store.set(TOKEN_KEY, token).await?;
        Ok(())
    }

    /// Rewrite only the user entry, leaving the token untouched.
    pub async fn write_user(&self, user: &User) -> Result<(), CredentialStoreError> {
        let raw = serde_json::to_string(user)?;
        self.store.set(USER_KEY, &raw).await
    }

    /// Remove both entries.
    pub async fn clear(&self) -> Result<(), CredentialStoreError> {
        self.store.delete(USER_KEY).await?;
        self.store.delete(TOKEN_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn vault() -> (Arc<MemoryCredentialStore>, CredentialVault) {
        let store = Arc::new(MemoryCredentialStore::new());
        let vault = CredentialVault::new(store.clone());
        (store, vault)
    }

    #[tokio::test]
    async fn test_vault_round_trip() {
        let (_, vault) = vault();
        let user = User::new("1", "ana", Role::Admin);
        vault.write(&user, "tok123").await.unwrap();

        let (read_user, read_token) = vault.read().await.unwrap();
        assert_eq!(read_user, Some(user));
        assert_eq!(read_token, Some("tok123".to_string()));
    }

    #[tokio::test]
    async fn test_vault_empty_store_reads_none() {
        let (_, vault) = vault();
        let (user, token) = vault.read().await.unwrap();
        assert!(user.is_none());
        assert!(token.is_none());
    }

    #[tokio::test]
    async fn test_vault_clear_removes_both() {
        let (store, vault) = vault();
        let user = User::new("1", "ana", Role::Admin);
        vault.write(&user, "tok123").await.unwrap();
        vault.clear().await.unwrap();

        assert_eq!(store.get(USER_KEY).await.unwrap(), None);
        assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_vault_corrupt_user_is_total_miss() {
        let (store, vault) = vault();
        store.set(USER_KEY, "{not valid json").await.unwrap();
        store.set(TOKEN_KEY, "tok123").await.unwrap();

        let (user, token) = vault.read().await.unwrap();
        assert!(user.is_none());
        assert!(token.is_none());

        // Both entries are gone, including the previously valid token.
        assert_eq!(store.get(USER_KEY).await.unwrap(), None);
        assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_vault_user_missing_rol_is_corrupt() {
        let (store, vault) = vault();
        let raw = r#"{"id":"1","nombres":"Ana","apellidos":"Lopez","username":"ana","correo":"ana@clinica.com"}"#;
        store.set(USER_KEY, raw).await.unwrap();
        store.set(TOKEN_KEY, "tok123").await.unwrap();

        let (user, token) = vault.read().await.unwrap();
        assert!(user.is_none());
        assert!(token.is_none());
        assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_vault_write_user_keeps_token() {
        let (store, vault) = vault();
        let mut user = User::new("1", "ana", Role::Admin);
        vault.write(&user, "tok123").await.unwrap();

        user.nombres = "Ana María".into();
        vault.write_user(&user).await.unwrap();

        let (read_user, read_token) = vault.read().await.unwrap();
        assert_eq!(read_user.unwrap().nombres, "Ana María");
        assert_eq!(read_token, Some("tok123".to_string()));
        assert!(store.get(USER_KEY).await.unwrap().is_some());
    }
}
