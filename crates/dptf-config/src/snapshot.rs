//! Config snapshots for diagnostics.
//!
//! A snapshot records which platform description a run was driven by, so
//! logged submissions can be traced back to an exact file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::platform::PlatformConfig;
use crate::resolve::{ConfigSource, PlatformPath};

/// A frozen snapshot of the loaded platform description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the platform file.
    pub schema_version: String,

    /// Path the platform was loaded from.
    #[serde(default)]
    pub path: Option<String>,

    /// Source of the platform description.
    pub source: String,

    /// SHA-256 of the file contents, or of the serialized default.
    pub content_hash: String,

    pub participant_count: usize,
    pub domain_count: usize,
}

impl ConfigSnapshot {
    /// Create a snapshot from a loaded platform and its raw JSON.
    pub fn new(config: &PlatformConfig, resolved: &PlatformPath, raw_json: &str) -> Self {
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: config.schema_version.clone(),
            path: resolved.path.as_ref().map(|p| p.display().to_string()),
            source: resolved.source.to_string(),
            content_hash: hash_content(raw_json),
            participant_count: config.participants.len(),
            domain_count: config.domains().count(),
        }
    }

    /// Snapshot for the built-in default platform.
    pub fn from_default(config: &PlatformConfig) -> Self {
        let raw = serde_json::to_string(config).unwrap_or_default();
        let resolved = PlatformPath {
            path: None,
            source: ConfigSource::BuiltinDefault,
        };
        Self::new(config, &resolved, &raw)
    }
}

/// SHA-256 hex digest of a string.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_content_stable() {
        assert_eq!(hash_content("abc"), hash_content("abc"));
        assert_ne!(hash_content("abc"), hash_content("abd"));
        assert_eq!(hash_content("").len(), 64);
    }

    #[test]
    fn test_default_snapshot() {
        let config = PlatformConfig::default();
        let snapshot = ConfigSnapshot::from_default(&config);
        assert_eq!(snapshot.source, "builtin default");
        assert!(snapshot.path.is_none());
        assert_eq!(snapshot.participant_count, 2);
        assert_eq!(snapshot.domain_count, 2);
    }
}
