//! Credential store: one global username→password map plus the persisted
//! session pointer, both living in a `KvStore`.
//!
//! Every mutation is a full read-modify-write of the user map blob. The map
//! is expected to stay tiny (a handful of local accounts), so no finer
//! granularity is warranted.

use std::{collections::BTreeMap, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use jot_core::{
    auth::{AuthStore, StoredUser},
    storage::{KvError, KvStore},
};
use tracing::instrument;

const USERS_KEY: &str = "@users";
const CURRENT_USER_KEY: &str = "@current_user";

/// `AuthStore` backed by any `KvStore`.
pub struct KvAuthStore<S: KvStore> {
    store: Arc<S>,
}

impl<S: KvStore> KvAuthStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    async fn load_users(&self) -> Result<BTreeMap<String, StoredUser>> {
        match self.store.get(USERS_KEY).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(KvError::NotFound { .. }) => Ok(BTreeMap::new()),
            Err(err) => Err(anyhow::anyhow!(err.to_string())),
        }
    }

    async fn save_users(&self, users: &BTreeMap<String, StoredUser>) -> Result<()> {
        let bytes = serde_json::to_vec(users)?;
        self.store
            .put(USERS_KEY, &bytes)
            .await
            .map_err(|e| anyhow::anyhow!(e.to_string()))
    }

    async fn set_session(&self, username: &str) -> Result<()> {
        // Stored as the raw username bytes, not JSON.
        self.store
            .put(CURRENT_USER_KEY, username.as_bytes())
            .await
            .map_err(|e| anyhow::anyhow!(e.to_string()))
    }
}

#[async_trait]
impl<S: KvStore> AuthStore for KvAuthStore<S> {
    #[instrument(skip(self, password))]
    async fn register(&self, username: &str, password: &str) -> Result<bool> {
        let mut users = self.load_users().await?;
        if users.contains_key(username) {
            return Ok(false);
        }

        users.insert(
            username.to_string(),
            StoredUser {
                password: password.to_string(),
            },
        );
        self.save_users(&users).await?;
        self.set_session(username).await?;
        Ok(true)
    }

    #[instrument(skip(self, password))]
    async fn login(&self, username: &str, password: &str) -> Result<bool> {
        let users = self.load_users().await?;
        match users.get(username) {
            Some(user) if user.password == password => {
                self.set_session(username).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    #[instrument(skip(self))]
    async fn logout(&self) -> Result<()> {
        self.store
            .delete(CURRENT_USER_KEY)
            .await
            .map_err(|e| anyhow::anyhow!(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn current_user(&self) -> Result<Option<String>> {
        match self.store.get(CURRENT_USER_KEY).await {
            Ok(bytes) => Ok(Some(String::from_utf8(bytes)?)),
            Err(KvError::NotFound { .. }) => Ok(None),
            Err(err) => Err(anyhow::anyhow!(err.to_string())),
        }
    }
}
