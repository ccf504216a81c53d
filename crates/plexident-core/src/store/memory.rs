// In-memory credential store, backed by a HashMap.
//
// Used by tests and by embedders that do not want credentials to outlive
// the process.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CredentialStore, CredentialStoreError};

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    store: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        let store = self.store.lock().unwrap();
        Ok(store.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CredentialStoreError> {
        let mut store = self.store.lock().unwrap();
        store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CredentialStoreError> {
        let mut store = self.store.lock().unwrap();
        store.remove(key);
        Ok(())
    }
}
