//! Strict manifest parsing and validation.

use chrono::{DateTime, Utc};
use semver::Version;
use serde::Deserialize;
use thiserror::Error;

use super::types::{AssetDescriptor, Manifest};

/// Errors that can occur while parsing a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The document is not the expected JSON shape.
    #[error("invalid manifest JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The `version` field is not valid semver.
    #[error("invalid manifest version {value:?}: {reason}")]
    InvalidVersion { value: String, reason: String },

    /// The `created_at` field is not a valid RFC 3339 timestamp.
    #[error("invalid manifest timestamp {value:?}")]
    InvalidTimestamp { value: String },

    /// An asset key is unusable as a store file name.
    #[error("invalid asset key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// A declared checksum is not lowercase hex SHA-256.
    #[error("invalid checksum for asset {key:?}: {value:?}")]
    InvalidChecksum { key: String, value: String },
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    id: Option<String>,
    version: String,
    channel: Option<String>,
    created_at: String,
    launch_asset: RawAsset,
    #[serde(default)]
    assets: Vec<RawAsset>,
}

#[derive(Debug, Deserialize)]
struct RawAsset {
    url: String,
    key: String,
    checksum: Option<String>,
}

/// Parse and validate a manifest document.
///
/// Beyond JSON shape, this enforces the invariants the rest of the system
/// relies on: a semver `version`, an RFC 3339 `created_at`, asset keys that
/// are single path segments, and checksums that are lowercase hex SHA-256.
pub fn parse_manifest(bytes: &[u8]) -> Result<Manifest, ManifestError> {
    let raw: RawManifest = serde_json::from_slice(bytes)?;

    let version = Version::parse(&raw.version).map_err(|e| ManifestError::InvalidVersion {
        value: raw.version.clone(),
        reason: e.to_string(),
    })?;

    let created_at = DateTime::parse_from_rfc3339(&raw.created_at)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ManifestError::InvalidTimestamp {
            value: raw.created_at.clone(),
        })?;

    let launch_asset = validate_asset(raw.launch_asset, true)?;
    let assets = raw
        .assets
        .into_iter()
        .map(|a| validate_asset(a, false))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Manifest {
        id: raw.id,
        version,
        channel: raw.channel,
        created_at,
        launch_asset,
        assets,
    })
}

fn validate_asset(raw: RawAsset, is_launch_asset: bool) -> Result<AssetDescriptor, ManifestError> {
    validate_key(&raw.key)?;

    if let Some(checksum) = &raw.checksum {
        let valid =
            checksum.len() == 64 && checksum.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase());
        if !valid {
            return Err(ManifestError::InvalidChecksum {
                key: raw.key,
                value: checksum.clone(),
            });
        }
    }

    Ok(AssetDescriptor {
        url: raw.url,
        key: raw.key,
        checksum: raw.checksum,
        is_launch_asset,
    })
}

/// Keys map directly to file names under the updates directory, so they must
/// be non-empty single path segments.
fn validate_key(key: &str) -> Result<(), ManifestError> {
    if key.is_empty() {
        return Err(ManifestError::InvalidKey {
            key: key.to_string(),
            reason: "empty".to_string(),
        });
    }
    if key.contains('/') || key.contains('\\') {
        return Err(ManifestError::InvalidKey {
            key: key.to_string(),
            reason: "contains a path separator".to_string(),
        });
    }
    if key == "." || key == ".." {
        return Err(ManifestError::InvalidKey {
            key: key.to_string(),
            reason: "not a file name".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "id": "release-42",
        "version": "1.4.2",
        "channel": "stable",
        "created_at": "2025-07-01T12:00:00Z",
        "launch_asset": { "url": "https://cdn.example.com/bundle", "key": "bundle-4f2a" },
        "assets": [
            { "url": "https://cdn.example.com/logo", "key": "logo-91cc" }
        ]
    }"#;

    #[test]
    fn test_parse_valid_manifest() {
        let manifest = parse_manifest(VALID.as_bytes()).unwrap();
        assert_eq!(manifest.version, Version::new(1, 4, 2));
        assert_eq!(manifest.channel.as_deref(), Some("stable"));
        assert_eq!(manifest.update_id().as_str(), "release-42");
        assert!(manifest.launch_asset.is_launch_asset);
        assert_eq!(manifest.assets.len(), 1);
        assert!(!manifest.assets[0].is_launch_asset);
    }

    #[test]
    fn test_parse_minimal_manifest() {
        let json = r#"{
            "version": "0.1.0",
            "created_at": "2025-07-01T12:00:00+02:00",
            "launch_asset": { "url": "https://cdn.example.com/bundle", "key": "bundle" }
        }"#;
        let manifest = parse_manifest(json.as_bytes()).unwrap();
        assert!(manifest.channel.is_none());
        assert!(manifest.assets.is_empty());
        // Derived id, not explicit
        assert_eq!(manifest.update_id().as_str().len(), 64);
    }

    #[test]
    fn test_parse_rejects_bad_json() {
        let result = parse_manifest(b"not json");
        assert!(matches!(result, Err(ManifestError::Json(_))));
    }

    #[test]
    fn test_parse_rejects_bad_version() {
        let json = VALID.replace("1.4.2", "latest");
        let result = parse_manifest(json.as_bytes());
        assert!(matches!(result, Err(ManifestError::InvalidVersion { .. })));
    }

    #[test]
    fn test_parse_rejects_bad_timestamp() {
        let json = VALID.replace("2025-07-01T12:00:00Z", "July 1st");
        let result = parse_manifest(json.as_bytes());
        assert!(matches!(result, Err(ManifestError::InvalidTimestamp { .. })));
    }

    #[test]
    fn test_parse_rejects_path_traversal_key() {
        for bad in ["../escape", "a/b", "a\\b", "", ".."] {
            let json = VALID.replace("bundle-4f2a", bad);
            let result = parse_manifest(json.as_bytes());
            assert!(
                matches!(result, Err(ManifestError::InvalidKey { .. })),
                "key {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_bad_checksum() {
        let json = r#"{
            "version": "0.1.0",
            "created_at": "2025-07-01T12:00:00Z",
            "launch_asset": { "url": "u", "key": "k", "checksum": "SHORT" }
        }"#;
        let result = parse_manifest(json.as_bytes());
        assert!(matches!(result, Err(ManifestError::InvalidChecksum { .. })));
    }

    #[test]
    fn test_parse_accepts_valid_checksum() {
        let json = format!(
            r#"{{
                "version": "0.1.0",
                "created_at": "2025-07-01T12:00:00Z",
                "launch_asset": {{ "url": "u", "key": "k", "checksum": "{}" }}
            }}"#,
            "ab".repeat(32)
        );
        let manifest = parse_manifest(json.as_bytes()).unwrap();
        assert_eq!(manifest.launch_asset.checksum.as_deref(), Some("ab".repeat(32).as_str()));
    }
}
