//! API key presence and verification flags.
//!
//! Keys are never sent anywhere; verification is simulated. The bucket
//! shape round-trips exactly across reloads, including the camelCase key
//! names.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::types::Platform;

pub const API_KEYS_FILE: &str = "api-keys.json";

/// Contents of `api-keys.json`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeys {
    pub github_api_key: Option<String>,
    pub gitlab_api_key: Option<String>,
    pub github_api_key_verified: bool,
    pub gitlab_api_key_verified: bool,
    pub data_loaded: bool,
}

impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeys")
            .field("github_api_key", &self.github_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("gitlab_api_key", &self.gitlab_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("github_api_key_verified", &self.github_api_key_verified)
            .field("gitlab_api_key_verified", &self.gitlab_api_key_verified)
            .field("data_loaded", &self.data_loaded)
            .finish()
    }
}

impl ApiKeys {
    pub fn key_for(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::GitHub => self.github_api_key.as_deref(),
            Platform::GitLab => self.gitlab_api_key.as_deref(),
            Platform::SelfHosted => None,
        }
    }

    pub fn verified_for(&self, platform: Platform) -> bool {
        match platform {
            Platform::GitHub => self.github_api_key_verified,
            Platform::GitLab => self.gitlab_api_key_verified,
            Platform::SelfHosted => false,
        }
    }
}

static API_KEYS: Lazy<RwLock<ApiKeys>> =
    Lazy::new(|| RwLock::new(super::load_bucket(API_KEYS_FILE)));

/// Snapshot of the current key state.
pub fn current() -> ApiKeys {
    API_KEYS.read().clone()
}

/// Record a key and its verification outcome for a platform and persist
/// both. A rejected key explicitly sets the verified flag to false rather
/// than leaving the previous value in place.
pub fn set_key(platform: Platform, key: Option<String>, verified: bool) -> Result<()> {
    let mut keys = API_KEYS.write();
    match platform {
        Platform::GitHub => {
            keys.github_api_key = key;
            keys.github_api_key_verified = verified;
        }
        Platform::GitLab => {
            keys.gitlab_api_key = key;
            keys.gitlab_api_key_verified = verified;
        }
        Platform::SelfHosted => {}
    }
    super::save_bucket(API_KEYS_FILE, &*keys)
}

/// Mark the mock repository data as loaded.
pub fn set_data_loaded(loaded: bool) -> Result<()> {
    let mut keys = API_KEYS.write();
    keys.data_loaded = loaded;
    super::save_bucket(API_KEYS_FILE, &*keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_shape_round_trips() {
        let keys = ApiKeys {
            github_api_key: Some("ghp_0123456789".to_string()),
            gitlab_api_key: None,
            github_api_key_verified: true,
            gitlab_api_key_verified: false,
            data_loaded: true,
        };
        let raw = serde_json::to_string(&keys).unwrap();
        assert!(raw.contains("\"githubApiKey\""));
        assert!(raw.contains("\"gitlabApiKeyVerified\":false"));
        assert!(raw.contains("\"dataLoaded\":true"));
        let back: ApiKeys = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, keys);
    }

    #[test]
    fn test_debug_redacts_keys() {
        let keys = ApiKeys {
            github_api_key: Some("secret-value".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", keys);
        assert!(!debug.contains("secret-value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_accessors() {
        let keys = ApiKeys {
            gitlab_api_key: Some("glpat-0123456789".to_string()),
            gitlab_api_key_verified: true,
            ..Default::default()
        };
        assert_eq!(keys.key_for(Platform::GitLab), Some("glpat-0123456789"));
        assert!(keys.verified_for(Platform::GitLab));
        assert!(!keys.verified_for(Platform::GitHub));
        assert_eq!(keys.key_for(Platform::SelfHosted), None);
    }
}
