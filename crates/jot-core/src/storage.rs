use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use thiserror::Error;

/// Errors produced by key-value storage implementations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KvError {
    /// Requested key does not exist.
    #[error("entry not found for key: {key}")]
    NotFound { key: String },
    /// Underlying storage failure.
    #[error("storage failure: {reason}")]
    Storage { reason: String },
}

/// Asynchronous key-value contract the credential and note stores persist
/// through. Keys are namespaced strings, values are opaque serialized bytes.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Persist a value under a key, overwriting any existing entry.
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), KvError>;

    /// Retrieve the value for a key.
    async fn get(&self, key: &str) -> Result<Vec<u8>, KvError>;

    /// Remove a key and its value (idempotent).
    async fn delete(&self, key: &str) -> Result<(), KvError>;
}

/// In-memory store for tests and smoke runs. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct InMemoryKvStore {
    inner: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), KvError> {
        let mut map = self.inner.lock().map_err(|err| KvError::Storage {
            reason: format!("lock poisoned: {err}"),
        })?;
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, KvError> {
        let map = self.inner.lock().map_err(|err| KvError::Storage {
            reason: format!("lock poisoned: {err}"),
        })?;

        map.get(key).cloned().ok_or_else(|| KvError::NotFound {
            key: key.to_string(),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        let mut map = self.inner.lock().map_err(|err| KvError::Storage {
            reason: format!("lock poisoned: {err}"),
        })?;
        map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_values() {
        let store = InMemoryKvStore::new();
        let key = "@notes_alice";
        let value = b"[]";

        store.put(key, value).await.expect("put should succeed");
        let retrieved = store.get(key).await.expect("get should succeed");

        assert_eq!(retrieved, value);
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let store = InMemoryKvStore::new();
        let err = store.get("@current_user").await.expect_err("should miss");
        assert!(matches!(err, KvError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_is_idempotent_and_removes_data() {
        let store = InMemoryKvStore::new();
        store.put("k", b"v").await.expect("put should succeed");
        store.delete("k").await.expect("delete should succeed");
        store
            .delete("k")
            .await
            .expect("delete again should still succeed");

        let err = store
            .get("k")
            .await
            .expect_err("get should fail after delete");
        assert!(matches!(err, KvError::NotFound { .. }));
    }
}
