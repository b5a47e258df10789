//! Updraft - coordinated acquisition of versioned updates.
//!
//! Updraft downloads a remote update - a manifest plus a set of
//! content-addressed assets - into durable local storage, so a host
//! application can later launch from a fully-downloaded, consistent update.
//!
//! The core is [`loader::RemoteLoader`]: one instance runs one load
//! session, which fetches and reconciles the manifest against persisted
//! state, fans out concurrent asset downloads, and promotes the update to
//! ready if and only if every asset landed. Network transfer and
//! persistence are collaborators behind the [`fetch`] and [`store`] traits,
//! with reference implementations included.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use updraft::fetch::{DiskAssetFetcher, HttpManifestFetcher, ReqwestClient};
//! use updraft::loader::{LoaderConfig, RemoteLoader};
//! use updraft::store::JsonUpdateStore;
//!
//! let store = Arc::new(JsonUpdateStore::open("updates/store.json")?);
//! let loader = RemoteLoader::new(
//!     HttpManifestFetcher::new(ReqwestClient::new()?),
//!     DiskAssetFetcher::new(ReqwestClient::new()?),
//!     Arc::clone(&store),
//!     LoaderConfig::new("updates/assets".into()),
//! );
//!
//! let update = loader.start(&manifest_url, |_manifest| true).await?;
//! ```

pub mod fetch;
pub mod loader;
pub mod log;
pub mod manifest;
pub mod store;
pub mod update;

pub use loader::{LoaderConfig, LoaderError, RemoteLoader};
pub use manifest::Manifest;
pub use update::{AssetRecord, UpdateId, UpdateRecord, UpdateStatus};
