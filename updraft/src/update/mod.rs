//! Update and asset record types.
//!
//! These are the durable records tracked by an [`UpdateStore`]: an update is
//! a versioned, installable bundle, and an asset is one content file
//! belonging to one or more updates.
//!
//! # Lifecycle
//!
//! An [`UpdateRecord`] is created the first time a manifest with an unknown
//! id is seen, in status [`UpdateStatus::Pending`]. The only mutation this
//! subsystem performs is the `Pending` → `Ready` transition, which happens
//! exactly once, inside the loader's finalize step, and only when every
//! asset of the update is accounted for with no failures. Records are never
//! deleted here.
//!
//! [`UpdateStore`]: crate::store::UpdateStore

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use semver::Version;

/// Identity of an update, derived from its manifest.
///
/// Ids are stable: the same manifest always derives the same id, which is
/// what lets a later load attempt reconcile against a previously persisted
/// record. See [`Manifest::update_id`](crate::manifest::Manifest::update_id)
/// for the derivation rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpdateId(String);

impl UpdateId {
    /// Create an update id from a pre-derived string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UpdateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UpdateId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a persisted update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// The update row exists but not all of its assets are persisted.
    Pending,
    /// The manifest and every asset are fully persisted; the update is
    /// launchable.
    Ready,
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateStatus::Pending => f.write_str("pending"),
            UpdateStatus::Ready => f.write_str("ready"),
        }
    }
}

/// A versioned, installable update tracked in persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecord {
    /// Manifest-derived identity.
    pub id: UpdateId,

    /// Update version using semantic versioning.
    pub version: Version,

    /// Release channel the update was published to, if any.
    pub channel: Option<String>,

    /// When the update was created by the publisher.
    pub created_at: DateTime<Utc>,

    /// Whether the update is launchable.
    pub status: UpdateStatus,
}

impl UpdateRecord {
    /// Check if the update is launchable.
    pub fn is_ready(&self) -> bool {
        self.status == UpdateStatus::Ready
    }
}

/// One content file belonging to an update.
///
/// Assets are identified by a stable content `key` and may be shared by any
/// number of updates: the first download creates the row, and later updates
/// referencing the same key link to it instead of duplicating storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// Stable content identity; also the file name under the updates
    /// directory.
    pub key: String,

    /// Remote source the asset was fetched from.
    pub url: String,

    /// Whether this is the primary asset required to boot the update.
    pub is_launch_asset: bool,

    /// Local path where the asset bytes live.
    pub path: PathBuf,
}
