use color_eyre::Result;
use jot_auth::KvAuthStore;
use jot_core::auth::AuthStore;

use crate::{config, storage};

/// Passwords shorter than this are rejected at signup.
const MIN_PASSWORD_LEN: usize = 4;

/// Create an account and start a session.
pub async fn signup(username: &str, password: &str, config: &config::Config) -> Result<()> {
    let username = normalize_username(username);
    if username.is_empty() || password.is_empty() {
        color_eyre::eyre::bail!("username and password must not be empty");
    }
    if password.len() < MIN_PASSWORD_LEN {
        color_eyre::eyre::bail!("password too short (minimum {MIN_PASSWORD_LEN} characters)");
    }

    let auth = auth_store(config)?;
    let created = auth
        .register(&username, password)
        .await
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
    if !created {
        color_eyre::eyre::bail!("username already exists");
    }
    println!("Welcome, {username}! You are now logged in.");
    Ok(())
}

/// Start a session for an existing user.
pub async fn login(username: &str, password: &str, config: &config::Config) -> Result<()> {
    let username = normalize_username(username);
    if username.is_empty() || password.is_empty() {
        color_eyre::eyre::bail!("username and password must not be empty");
    }

    let auth = auth_store(config)?;
    let ok = auth
        .login(&username, password)
        .await
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
    if !ok {
        color_eyre::eyre::bail!("invalid credentials");
    }
    println!("Logged in as {username}.");
    Ok(())
}

pub async fn logout(config: &config::Config) -> Result<()> {
    let auth = auth_store(config)?;
    auth.logout()
        .await
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
    println!("Logged out.");
    Ok(())
}

pub async fn whoami(config: &config::Config) -> Result<()> {
    match session_user(config).await? {
        Some(user) => println!("{user}"),
        None => println!("Not logged in."),
    }
    Ok(())
}

/// The persisted session, restored without re-validation.
pub async fn session_user(config: &config::Config) -> Result<Option<String>> {
    let auth = auth_store(config)?;
    auth.current_user()
        .await
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))
}

fn auth_store(config: &config::Config) -> Result<KvAuthStore<jot_storage::file_store::FileStore>> {
    Ok(KvAuthStore::new(storage::store_from_config(config)?))
}

/// Usernames are compared exactly by the store; the CLI normalizes to
/// trimmed lowercase before every call so `Alice ` and `alice` are the
/// same account.
fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}
