//! Persisted session token slot.
//!
//! The session gate keeps exactly one opaque token in local persistent
//! storage under the key [`TOKEN_KEY`].

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use field_common::{FieldError, FieldResult};

/// Key of the single token slot.
pub const TOKEN_KEY: &str = "token";

/// A single key-value slot holding the session token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any.
    async fn get(&self) -> FieldResult<Option<String>>;

    /// Persist a token, replacing any previous value.
    async fn set(&self, token: &str) -> FieldResult<()>;

    /// Remove the persisted token. Clearing an empty slot is not an error.
    async fn clear(&self) -> FieldResult<()>;
}

/// Token slot stored as a file named [`TOKEN_KEY`] inside a data directory.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(TOKEN_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> FieldResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(token) => Ok(Some(token)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FieldError::StorageError(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn set(&self, token: &str) -> FieldResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, token).await?;
        debug!(path = %self.path.display(), "Persisted session token");
        Ok(())
    }

    async fn clear(&self) -> FieldResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Token slot held in memory.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a token, as if persisted by an earlier run.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> FieldResult<Option<String>> {
        Ok(self.slot.lock().await.clone())
    }

    async fn set(&self, token: &str) -> FieldResult<()> {
        *self.slot.lock().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> FieldResult<()> {
        *self.slot.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        assert_eq!(store.get().await.unwrap(), None);

        store.set("admin").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("admin"));
        assert!(store.path().ends_with(TOKEN_KEY));

        store.clear().await.unwrap();
        assert_eq!(store.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("data"));
        store.set("secret").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_clear_empty_slot_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        store.clear().await.unwrap();

        let memory = MemoryTokenStore::new();
        memory.clear().await.unwrap();
        assert_eq!(memory.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_with_token() {
        let store = MemoryTokenStore::with_token("admin");
        assert_eq!(store.get().await.unwrap().as_deref(), Some("admin"));
        store.set("other").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("other"));
    }
}
