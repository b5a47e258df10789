//! Durable update persistence.
//!
//! The loader core treats persistence as an external collaborator behind
//! the [`UpdateStore`] trait, which mirrors the write pattern of the load
//! flow: reconciliation reads one update row, and all writes happen once,
//! inside the single finalize step. The trait is synchronous for that
//! reason; implementations are cheap in-process structures.
//!
//! Two implementations are provided:
//!
//! - [`MemoryUpdateStore`] - concurrent maps, for tests and embedding.
//! - [`JsonUpdateStore`] - a single JSON index document on disk, replaced
//!   atomically on every mutation.
//!
//! # Asset sharing
//!
//! Assets are many-to-many with updates. Asset rows are keyed by content
//! key; updates reference them through link entries. Inserting an asset for
//! one update and linking it from another never duplicates the row.

mod json;
mod memory;

pub use json::JsonUpdateStore;
pub use memory::MemoryUpdateStore;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::update::{AssetRecord, UpdateId, UpdateRecord};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the index from disk.
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    /// Failed to write the index to disk.
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    /// The on-disk index is not readable as a store index.
    #[error("invalid store index {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// An operation referenced an update id that is not persisted.
    #[error("unknown update {0}")]
    UnknownUpdate(UpdateId),
}

/// Storage collaborator for update and asset records.
pub trait UpdateStore: Send + Sync {
    /// Load one update row by id.
    fn load_update(&self, id: &UpdateId) -> Result<Option<UpdateRecord>, StoreError>;

    /// Insert a new update row.
    fn insert_update(&self, update: &UpdateRecord) -> Result<(), StoreError>;

    /// Insert newly downloaded asset rows and link them to an update.
    fn insert_assets(&self, assets: &[AssetRecord], update_id: &UpdateId)
        -> Result<(), StoreError>;

    /// Link an already-persisted asset row to an update by key.
    ///
    /// A key with no stored row is logged and skipped; the link is only
    /// meaningful for an asset that exists.
    fn link_existing_asset(
        &self,
        update_id: &UpdateId,
        key: &str,
        is_launch_asset: bool,
    ) -> Result<(), StoreError>;

    /// Transition an update to [`Ready`](crate::update::UpdateStatus::Ready).
    fn mark_ready(&self, update_id: &UpdateId) -> Result<(), StoreError>;

    /// All persisted updates.
    fn list_updates(&self) -> Result<Vec<UpdateRecord>, StoreError>;

    /// The assets linked to one update, launch flag taken from the link.
    fn assets_for_update(&self, id: &UpdateId) -> Result<Vec<AssetRecord>, StoreError>;
}
