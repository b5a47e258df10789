//! JSON-file-backed update store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use semver::Version;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{StoreError, UpdateStore};
use crate::update::{AssetRecord, UpdateId, UpdateRecord, UpdateStatus};

/// Durable [`UpdateStore`] backed by a single JSON index document.
///
/// The whole index is held in memory behind a mutex and rewritten on every
/// mutation, via a temporary file renamed over the index so readers never
/// observe a torn document. Suited to the scale of this store: tens of
/// updates, not millions.
pub struct JsonUpdateStore {
    path: PathBuf,
    index: Mutex<StoreIndex>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreIndex {
    #[serde(default)]
    updates: BTreeMap<String, StoredUpdate>,
    #[serde(default)]
    assets: BTreeMap<String, StoredAsset>,
    #[serde(default)]
    links: BTreeMap<String, Vec<StoredLink>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredUpdate {
    version: String,
    channel: Option<String>,
    created_at: String,
    status: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredAsset {
    url: String,
    path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredLink {
    key: String,
    is_launch_asset: bool,
}

const STATUS_PENDING: &str = "pending";
const STATUS_READY: &str = "ready";

impl JsonUpdateStore {
    /// Open a store at `path`, creating an empty index if none exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let index = if path.exists() {
            let bytes = fs::read(&path).map_err(|e| StoreError::Read {
                path: path.clone(),
                source: e,
            })?;
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                path: path.clone(),
                reason: e.to_string(),
            })?
        } else {
            StoreIndex::default()
        };

        Ok(Self {
            path,
            index: Mutex::new(index),
        })
    }

    /// Path of the index document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, index: &StoreIndex) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let bytes = serde_json::to_vec_pretty(index).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes).map_err(|e| StoreError::Write {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(())
    }

    fn decode_update(&self, id: &str, stored: &StoredUpdate) -> Result<UpdateRecord, StoreError> {
        let version = Version::parse(&stored.version).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            reason: format!("update {id}: bad version: {e}"),
        })?;
        let created_at = DateTime::parse_from_rfc3339(&stored.created_at)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                reason: format!("update {id}: bad timestamp: {e}"),
            })?;
        let status = match stored.status.as_str() {
            STATUS_PENDING => UpdateStatus::Pending,
            STATUS_READY => UpdateStatus::Ready,
            other => {
                return Err(StoreError::Corrupt {
                    path: self.path.clone(),
                    reason: format!("update {id}: bad status {other:?}"),
                })
            }
        };

        Ok(UpdateRecord {
            id: UpdateId::new(id),
            version,
            channel: stored.channel.clone(),
            created_at,
            status,
        })
    }
}

fn encode_update(update: &UpdateRecord) -> StoredUpdate {
    StoredUpdate {
        version: update.version.to_string(),
        channel: update.channel.clone(),
        created_at: update.created_at.to_rfc3339(),
        status: match update.status {
            UpdateStatus::Pending => STATUS_PENDING.to_string(),
            UpdateStatus::Ready => STATUS_READY.to_string(),
        },
    }
}

fn push_link(links: &mut BTreeMap<String, Vec<StoredLink>>, update_id: &UpdateId, key: &str, is_launch_asset: bool) {
    let entry = links.entry(update_id.as_str().to_string()).or_default();
    if entry.iter().any(|l| l.key == key) {
        return;
    }
    entry.push(StoredLink {
        key: key.to_string(),
        is_launch_asset,
    });
}

impl UpdateStore for JsonUpdateStore {
    fn load_update(&self, id: &UpdateId) -> Result<Option<UpdateRecord>, StoreError> {
        let index = self.index.lock();
        index
            .updates
            .get(id.as_str())
            .map(|stored| self.decode_update(id.as_str(), stored))
            .transpose()
    }

    fn insert_update(&self, update: &UpdateRecord) -> Result<(), StoreError> {
        let mut index = self.index.lock();
        index
            .updates
            .insert(update.id.as_str().to_string(), encode_update(update));
        self.persist(&index)
    }

    fn insert_assets(
        &self,
        assets: &[AssetRecord],
        update_id: &UpdateId,
    ) -> Result<(), StoreError> {
        let mut index = self.index.lock();
        for asset in assets {
            index.assets.insert(
                asset.key.clone(),
                StoredAsset {
                    url: asset.url.clone(),
                    path: asset.path.clone(),
                },
            );
            push_link(&mut index.links, update_id, &asset.key, asset.is_launch_asset);
        }
        self.persist(&index)
    }

    fn link_existing_asset(
        &self,
        update_id: &UpdateId,
        key: &str,
        is_launch_asset: bool,
    ) -> Result<(), StoreError> {
        let mut index = self.index.lock();
        if !index.assets.contains_key(key) {
            warn!(%update_id, key, "cannot link asset with no stored row; skipping");
            return Ok(());
        }
        push_link(&mut index.links, update_id, key, is_launch_asset);
        self.persist(&index)
    }

    fn mark_ready(&self, update_id: &UpdateId) -> Result<(), StoreError> {
        let mut index = self.index.lock();
        let stored = index
            .updates
            .get_mut(update_id.as_str())
            .ok_or_else(|| StoreError::UnknownUpdate(update_id.clone()))?;
        stored.status = STATUS_READY.to_string();
        self.persist(&index)
    }

    fn list_updates(&self) -> Result<Vec<UpdateRecord>, StoreError> {
        let index = self.index.lock();
        index
            .updates
            .iter()
            .map(|(id, stored)| self.decode_update(id, stored))
            .collect()
    }

    fn assets_for_update(&self, id: &UpdateId) -> Result<Vec<AssetRecord>, StoreError> {
        let index = self.index.lock();
        let Some(links) = index.links.get(id.as_str()) else {
            return Ok(Vec::new());
        };

        let mut records = Vec::with_capacity(links.len());
        for link in links {
            if let Some(asset) = index.assets.get(&link.key) {
                records.push(AssetRecord {
                    key: link.key.clone(),
                    url: asset.url.clone(),
                    is_launch_asset: link.is_launch_asset,
                    path: asset.path.clone(),
                });
            }
        }
        Ok(records)
    }
}
