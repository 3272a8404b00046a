use std::path::PathBuf;

use crate::config::Config;
use color_eyre::Result;
use dirs::data_dir;
use jot_storage::file_store::FileStore;
use tracing::debug;

/// Resolve the default data directory for jot.
pub fn default_data_dir() -> Result<PathBuf> {
    let base = data_dir().ok_or_else(|| color_eyre::eyre::eyre!("no data dir available"))?;
    Ok(base.join("jot"))
}

/// Build the file-backed store, honoring a config override for its root.
pub fn store_from_config(config: &Config) -> Result<FileStore> {
    let root = match &config.data_dir {
        Some(root) => root.clone(),
        None => default_data_dir()?,
    };
    debug!(?root, "initializing file store");
    Ok(FileStore::new(root))
}

/// Helper for tests to construct a store rooted at a temp dir.
#[cfg(test)]
pub fn test_store(root: impl Into<PathBuf>) -> FileStore {
    FileStore::new(root)
}
