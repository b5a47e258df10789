//! Update manifest types and parsing.
//!
//! A manifest is the remote-declared descriptor of an update: its identity,
//! version, and the list of content-addressed assets that make it up. The
//! manifest format is a single JSON document:
//!
//! ```json
//! {
//!     "id": "optional explicit id",
//!     "version": "1.4.2",
//!     "channel": "stable",
//!     "created_at": "2025-07-01T12:00:00Z",
//!     "launch_asset": { "url": "https://...", "key": "bundle-4f2a", "checksum": "..." },
//!     "assets": [
//!         { "url": "https://...", "key": "logo-91cc", "checksum": "..." }
//!     ]
//! }
//! ```
//!
//! Asset keys double as file names in the local content-addressed store, so
//! parsing rejects keys that are empty or contain path separators or `..`.
//!
//! # Update identity
//!
//! Every manifest derives a stable [`UpdateId`]: the explicit `id` field
//! when present, otherwise a SHA-256 digest over the version, creation time,
//! and launch asset key. Stability is what lets a later load attempt
//! reconcile against a previously persisted update row.
//!
//! [`UpdateId`]: crate::update::UpdateId

mod parse;
mod types;

pub use parse::{parse_manifest, ManifestError};
pub use types::{AssetDescriptor, Manifest};
