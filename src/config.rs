use crate::error::Result;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PREFIX: &str = "/";
pub const LOCAL_DB_FILENAME: &str = "blurt.json";
pub const SYNC_DB_FILENAME: &str = "blurt.sync.json";
pub const IMPORT_FILENAME: &str = "blurt.snippets.json";
pub const HOME_ENV: &str = "BLURT_HOME";

/// Keys the two documents are stored under, in both tiers and in legacy exports.
pub const SNIPPETS_KEY: &str = "blurt_snippets";
pub const SETTINGS_KEY: &str = "blurt_settings";

pub const DEFAULT_CHAR_LIMIT: usize = 5000;
pub const DEFAULT_MAX_ITEMS: usize = 8;
pub const MAX_ITEMS_CEILING: usize = 20;

/// Get the blurt configuration directory
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = env::var(HOME_ENV) {
        return PathBuf::from(dir);
    }
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".blurt"))
        .unwrap_or_else(|_| PathBuf::from(".blurt"))
}

/// Ensure the configuration directory exists
pub fn ensure_config_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(dir.to_path_buf())
}

/// Get the path to the local store file
pub fn get_local_db_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_DB_FILENAME)
}

/// Get the path to the sync store file
pub fn get_sync_db_path(dir: &Path) -> PathBuf {
    dir.join(SYNC_DB_FILENAME)
}
