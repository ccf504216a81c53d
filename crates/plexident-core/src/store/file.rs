// File-backed credential store.
//
// All keys live in a single JSON map, by default at
// `~/.plexident/credentials.json`. I/O is synchronous local-disk work;
// an in-process lock serializes concurrent tasks, and across processes
// the last writer wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::{fs, io};

use async_trait::async_trait;
use tracing::warn;

use super::{CredentialStore, CredentialStoreError};

#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    io_lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Store at the default location under the home directory.
    pub fn new() -> Self {
        Self::with_path(default_path())
    }

    /// Store at an explicit path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as an empty map. A file that no longer
    /// parses also reads as empty; the next write replaces it.
    fn load(&self) -> Result<HashMap<String, String>, CredentialStoreError> {
        match fs::File::open(&self.path) {
            Ok(fp) => match serde_json::from_reader(fp) {
                Ok(map) => Ok(map),
                Err(err) => {
                    warn!(path = %self.path.display(), error = %err,
                        "credential file is corrupt, treating as empty");
                    Ok(HashMap::new())
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, map: &HashMap<String, String>) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(&self.path)?;
        serde_json::to_writer_pretty(file, map)?;
        Ok(())
    }
}

impl Default for FileCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

fn default_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".plexident")
        .join("credentials.json")
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        let _guard = self.io_lock.lock().unwrap();
        Ok(self.load()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CredentialStoreError> {
        let _guard = self.io_lock.lock().unwrap();
        let mut map = self.load()?;
        map.insert(key.to_string(), value.to_string());
        self.save(&map)
    }

    async fn delete(&self, key: &str) -> Result<(), CredentialStoreError> {
        let _guard = self.io_lock.lock().unwrap();
        let mut map = self.load()?;
        if map.remove(key).is_some() {
            self.save(&map)?;
        }
        Ok(())
    }
}
