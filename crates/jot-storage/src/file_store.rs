use std::{
    fs::{self, File},
    io::{Read, Write},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jot_core::storage::{KvError, KvStore};
use tempfile::NamedTempFile;
use tracing::instrument;

/// File-backed store implementing the shared `KvStore` contract. Each key
/// maps to one file whose name is the URL-safe base64 of the key (keys like
/// `@notes_alice` are not path-safe as-is). Writes go through a temp file in
/// the same directory and an atomic rename, so a crash mid-write never
/// leaves a truncated blob behind.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(sanitize_key(key))
    }
}

#[async_trait]
impl KvStore for FileStore {
    #[instrument(skip_all, fields(key))]
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), KvError> {
        let path = self.path_for(key);
        write_atomic(&path, value)
    }

    #[instrument(skip_all, fields(key))]
    async fn get(&self, key: &str) -> Result<Vec<u8>, KvError> {
        let path = self.path_for(key);
        let mut file = File::open(&path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                KvError::NotFound {
                    key: key.to_string(),
                }
            } else {
                storage_err(err)
            }
        })?;

        let mut buf = Vec::new();
        file.read_to_end(&mut buf).map_err(storage_err)?;
        Ok(buf)
    }

    #[instrument(skip_all, fields(key))]
    async fn delete(&self, key: &str) -> Result<(), KvError> {
        let path = self.path_for(key);
        match fs::remove_file(path) {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_err(err)),
        }
    }
}

fn write_atomic(path: &Path, value: &[u8]) -> Result<(), KvError> {
    let parent = path.parent().ok_or_else(|| KvError::Storage {
        reason: "invalid storage path".to_string(),
    })?;
    fs::create_dir_all(parent).map_err(storage_err)?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(storage_err)?;
    tmp.write_all(value).map_err(storage_err)?;
    tmp.flush().map_err(storage_err)?;
    tmp.persist(path).map_err(|e| storage_err(e.error))?;
    Ok(())
}

fn sanitize_key(key: &str) -> String {
    URL_SAFE_NO_PAD.encode(key)
}

fn storage_err<E: ToString>(err: E) -> KvError {
    KvError::Storage {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());

        let key = "@notes_alice";
        let value = br#"[{"title":"Groceries"}]"#;

        store.put(key, value).await.expect("put");
        let read_back = store.get(key).await.expect("get");
        assert_eq!(read_back, value);
    }

    #[tokio::test]
    async fn overwrites_existing_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());

        store.put("@users", b"first").await.expect("put");
        store.put("@users", b"second").await.expect("put again");
        assert_eq!(store.get("@users").await.expect("get"), b"second");
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());

        let err = store.get("@current_user").await.expect_err("should miss");
        assert!(matches!(err, KvError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());
        store.put("k", b"v").await.expect("put");
        store.delete("k").await.expect("delete");
        store.delete("k").await.expect("delete again");

        let err = store.get("k").await.expect_err("should be missing");
        assert!(matches!(err, KvError::NotFound { .. }));
    }

    #[tokio::test]
    async fn distinct_keys_use_distinct_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());

        store.put("@notes_alice", b"a").await.expect("put");
        store.put("@notes_bob", b"b").await.expect("put");

        assert_eq!(store.get("@notes_alice").await.expect("get"), b"a");
        assert_eq!(store.get("@notes_bob").await.expect("get"), b"b");
    }
}
