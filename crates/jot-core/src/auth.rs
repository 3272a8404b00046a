use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Credential record stored in the global user map, keyed by username.
/// Passwords are plaintext; encrypting credentials is explicitly out of
/// scope for this tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    pub password: String,
}

/// Contract for the credential store and the persisted session pointer.
///
/// Validation outcomes (duplicate username, bad credentials) are booleans;
/// callers are not told why an attempt failed. Persistence failures
/// propagate as errors.
#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Create an account. `Ok(false)` when the username is already taken;
    /// on success the session is set to the new user.
    async fn register(&self, username: &str, password: &str) -> anyhow::Result<bool>;

    /// Check credentials. On success the session is set to the user.
    async fn login(&self, username: &str, password: &str) -> anyhow::Result<bool>;

    /// Clear the persisted session pointer (idempotent).
    async fn logout(&self) -> anyhow::Result<()>;

    /// The persisted session, if any. Not re-validated against the user
    /// map; users are never deleted so the pointer cannot dangle.
    async fn current_user(&self) -> anyhow::Result<Option<String>>;
}
