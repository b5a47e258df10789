//! In-memory update store.

use dashmap::DashMap;
use tracing::warn;

use super::{StoreError, UpdateStore};
use crate::update::{AssetRecord, UpdateId, UpdateRecord, UpdateStatus};

#[derive(Debug, Clone)]
struct AssetLink {
    key: String,
    is_launch_asset: bool,
}

/// Concurrent in-memory implementation of [`UpdateStore`].
///
/// Useful for tests and for hosts that manage durability themselves.
#[derive(Debug, Default)]
pub struct MemoryUpdateStore {
    updates: DashMap<UpdateId, UpdateRecord>,
    assets: DashMap<String, AssetRecord>,
    links: DashMap<UpdateId, Vec<AssetLink>>,
}

impl MemoryUpdateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn push_link(&self, update_id: &UpdateId, key: &str, is_launch_asset: bool) {
        let mut links = self.links.entry(update_id.clone()).or_default();
        if links.iter().any(|l| l.key == key) {
            return;
        }
        links.push(AssetLink {
            key: key.to_string(),
            is_launch_asset,
        });
    }
}

impl UpdateStore for MemoryUpdateStore {
    fn load_update(&self, id: &UpdateId) -> Result<Option<UpdateRecord>, StoreError> {
        Ok(self.updates.get(id).map(|r| r.value().clone()))
    }

    fn insert_update(&self, update: &UpdateRecord) -> Result<(), StoreError> {
        self.updates.insert(update.id.clone(), update.clone());
        Ok(())
    }

    fn insert_assets(
        &self,
        assets: &[AssetRecord],
        update_id: &UpdateId,
    ) -> Result<(), StoreError> {
        for asset in assets {
            self.assets.insert(asset.key.clone(), asset.clone());
            self.push_link(update_id, &asset.key, asset.is_launch_asset);
        }
        Ok(())
    }

    fn link_existing_asset(
        &self,
        update_id: &UpdateId,
        key: &str,
        is_launch_asset: bool,
    ) -> Result<(), StoreError> {
        if !self.assets.contains_key(key) {
            warn!(%update_id, key, "cannot link asset with no stored row; skipping");
            return Ok(());
        }
        self.push_link(update_id, key, is_launch_asset);
        Ok(())
    }

    fn mark_ready(&self, update_id: &UpdateId) -> Result<(), StoreError> {
        let mut update = self
            .updates
            .get_mut(update_id)
            .ok_or_else(|| StoreError::UnknownUpdate(update_id.clone()))?;
        update.status = UpdateStatus::Ready;
        Ok(())
    }

    fn list_updates(&self) -> Result<Vec<UpdateRecord>, StoreError> {
        Ok(self.updates.iter().map(|r| r.value().clone()).collect())
    }

    fn assets_for_update(&self, id: &UpdateId) -> Result<Vec<AssetRecord>, StoreError> {
        let Some(links) = self.links.get(id) else {
            return Ok(Vec::new());
        };

        let mut records = Vec::with_capacity(links.len());
        for link in links.iter() {
            if let Some(asset) = self.assets.get(&link.key) {
                let mut record = asset.value().clone();
                record.is_launch_asset = link.is_launch_asset;
                records.push(record);
            }
        }
        Ok(records)
    }
}
