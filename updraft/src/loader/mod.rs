//! Update load session orchestration.
//!
//! This module owns the hard part of update acquisition: reconciling a
//! freshly fetched manifest against prior persisted state, fanning out
//! concurrent per-asset downloads, aggregating their independently-arriving
//! outcomes under a strict completion barrier, and atomically deciding
//! whether the update is promotable to ready.
//!
//! # Flow
//!
//! ```text
//! RemoteLoader::start(url, on_manifest)
//!         │
//!         ├── ManifestFetcher ──► manifest
//!         ├── on_manifest(&manifest) == false ──► Ok(None)   (declined)
//!         ├── reconcile against UpdateStore
//!         │       ├── ready row found ──► Ok(Some(update))   (no downloads)
//!         │       ├── no row ──► insert pending row
//!         │       └── pending row ──► adopt it
//!         ├── fan out one AssetFetcher task per asset
//!         ├── AssetBarrier collects new / existing / failed
//!         └── finalize once: insert + link + conditional mark-ready
//! ```
//!
//! Partial asset failure is not session failure: the session still returns
//! success carrying the update, and the caller detects the partial result
//! from the update's non-ready status.

mod barrier;
mod config;
mod error;
mod session;

pub use config::LoaderConfig;
pub use error::LoaderError;
pub use session::RemoteLoader;
