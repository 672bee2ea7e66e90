//! Persisted UI preference stores.
//!
//! Two independent buckets survive restarts: the active AI model
//! (`ai-settings.json`) and the API key state (`api-keys.json`). Each is a
//! process-wide store behind a `RwLock`, lazily initialized from disk on
//! first access and written back on every mutation (last write wins; all
//! updates happen on the single UI thread).

pub mod ai;
pub mod api_keys;

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{OpsdeckError, Result};

pub use ai::{AiModel, AiSettings};
pub use api_keys::ApiKeys;

/// Environment override for the store directory, used by tests and by
/// users who want portable state.
pub const CONFIG_DIR_ENV: &str = "OPSDECK_CONFIG_DIR";

/// Directory holding the preference buckets.
pub fn store_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let proj_dirs = directories::ProjectDirs::from("com", "opsdeck", "opsdeck")
        .ok_or_else(|| OpsdeckError::Config("could not determine config directory".to_string()))?;
    Ok(proj_dirs.config_dir().to_path_buf())
}

/// Read a bucket, falling back to its default when the file is absent.
pub(crate) fn load_bucket<T: DeserializeOwned + Default>(file_name: &str) -> T {
    let Ok(path) = store_dir().map(|d| d.join(file_name)) else {
        return T::default();
    };
    match fs::read_to_string(&path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(file = %path.display(), error = %e, "ignoring corrupt store file");
            T::default()
        }),
        Err(_) => T::default(),
    }
}

/// Write a bucket, creating the store directory if needed.
pub(crate) fn save_bucket<T: Serialize>(file_name: &str, value: &T) -> Result<()> {
    let dir = store_dir()?;
    fs::create_dir_all(&dir)?;
    let path = dir.join(file_name);
    let raw = serde_json::to_string_pretty(value)?;
    fs::write(&path, raw)?;
    tracing::debug!(file = %path.display(), "saved preference bucket");
    Ok(())
}
