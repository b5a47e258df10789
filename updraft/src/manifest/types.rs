//! Manifest and asset descriptor types.

use chrono::{DateTime, Utc};
use semver::Version;
use sha2::{Digest, Sha256};

use crate::update::{UpdateId, UpdateRecord, UpdateStatus};

/// Descriptor of one asset declared by a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    /// Remote source of the asset bytes.
    pub url: String,

    /// Stable content identity; also the file name in the local store.
    pub key: String,

    /// Expected SHA-256 of the asset contents (lowercase hex), if declared.
    pub checksum: Option<String>,

    /// Whether this is the primary asset required to boot the update.
    pub is_launch_asset: bool,
}

/// A parsed update manifest.
///
/// Construct via [`parse_manifest`](super::parse_manifest); the parser
/// guarantees the version, timestamp, and asset keys are valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub(crate) id: Option<String>,

    /// Update version using semantic versioning.
    pub version: Version,

    /// Release channel the update was published to, if any.
    pub channel: Option<String>,

    /// When the update was created by the publisher.
    pub created_at: DateTime<Utc>,

    /// The primary asset required to boot the update.
    pub launch_asset: AssetDescriptor,

    /// All other assets belonging to the update.
    pub assets: Vec<AssetDescriptor>,
}

impl Manifest {
    /// Derive the identity of the update this manifest describes.
    ///
    /// An explicit `id` field wins; otherwise the id is a SHA-256 digest
    /// over the version, creation time, and launch asset key. Both paths
    /// are stable: re-fetching the same manifest derives the same id.
    pub fn update_id(&self) -> UpdateId {
        if let Some(id) = &self.id {
            return UpdateId::new(id.clone());
        }

        let mut hasher = Sha256::new();
        hasher.update(self.version.to_string().as_bytes());
        hasher.update(b"\n");
        hasher.update(self.created_at.to_rfc3339().as_bytes());
        hasher.update(b"\n");
        hasher.update(self.launch_asset.key.as_bytes());
        UpdateId::new(format!("{:x}", hasher.finalize()))
    }

    /// The full asset list of the update, launch asset first.
    ///
    /// No dedup is performed: a key listed twice is dispatched twice, and
    /// the second fetch resolves as already-existing.
    pub fn asset_list(&self) -> Vec<AssetDescriptor> {
        let mut list = Vec::with_capacity(1 + self.assets.len());
        list.push(self.launch_asset.clone());
        list.extend(self.assets.iter().cloned());
        list
    }

    /// Build a fresh pending update record from this manifest.
    pub fn update_record(&self) -> UpdateRecord {
        UpdateRecord {
            id: self.update_id(),
            version: self.version.clone(),
            channel: self.channel.clone(),
            created_at: self.created_at,
            status: UpdateStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn asset(key: &str, launch: bool) -> AssetDescriptor {
        AssetDescriptor {
            url: format!("https://cdn.example.com/{key}"),
            key: key.to_string(),
            checksum: None,
            is_launch_asset: launch,
        }
    }

    fn manifest(id: Option<&str>) -> Manifest {
        Manifest {
            id: id.map(str::to_string),
            version: Version::new(1, 2, 3),
            channel: Some("stable".to_string()),
            created_at: Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap(),
            launch_asset: asset("bundle-4f2a", true),
            assets: vec![asset("logo-91cc", false), asset("font-7de1", false)],
        }
    }

    #[test]
    fn test_explicit_id_wins() {
        let m = manifest(Some("release-42"));
        assert_eq!(m.update_id().as_str(), "release-42");
    }

    #[test]
    fn test_derived_id_is_stable() {
        let m = manifest(None);
        let a = m.update_id();
        let b = m.update_id();
        assert_eq!(a, b);
        // SHA-256 hex digest
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_derived_id_changes_with_version() {
        let m1 = manifest(None);
        let mut m2 = manifest(None);
        m2.version = Version::new(1, 2, 4);
        assert_ne!(m1.update_id(), m2.update_id());
    }

    #[test]
    fn test_asset_list_launch_first() {
        let m = manifest(None);
        let list = m.asset_list();
        assert_eq!(list.len(), 3);
        assert!(list[0].is_launch_asset);
        assert_eq!(list[0].key, "bundle-4f2a");
        assert!(!list[1].is_launch_asset);
    }

    #[test]
    fn test_update_record_is_pending() {
        let m = manifest(Some("release-42"));
        let record = m.update_record();
        assert_eq!(record.id.as_str(), "release-42");
        assert_eq!(record.status, UpdateStatus::Pending);
        assert_eq!(record.version, m.version);
        assert_eq!(record.channel.as_deref(), Some("stable"));
    }
}
