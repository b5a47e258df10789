//! Remote fetch collaborators.
//!
//! The loader core never talks to the network itself; it delegates to two
//! trait contracts:
//!
//! - [`ManifestFetcher`] resolves a manifest URL to a parsed [`Manifest`].
//! - [`AssetFetcher`] resolves one [`AssetDescriptor`] to local bytes,
//!   reporting whether the asset was newly written or already present. This
//!   is the only place new-vs-existing policy lives; the loader itself never
//!   skips an asset.
//!
//! Reference implementations are provided: [`HttpManifestFetcher`] and
//! [`DiskAssetFetcher`], both generic over an [`AsyncHttpClient`] so tests
//! can inject a mock transport.
//!
//! Retry, backoff, and authentication are deliberately out of scope here;
//! callers wanting them wrap the HTTP client.

mod asset;
mod checksum;
mod http;
mod manifest;

pub use asset::DiskAssetFetcher;
pub use checksum::{calculate_checksum, calculate_file_checksum, verify_file_checksum};
pub use http::{AsyncHttpClient, ReqwestClient};
pub use manifest::HttpManifestFetcher;

use std::future::Future;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::manifest::{AssetDescriptor, Manifest};
use crate::update::AssetRecord;

/// Errors that can occur while fetching manifests or assets.
///
/// Variants carry string reasons rather than source errors so the type is
/// `Clone`; mocks replay canned results and the loader records failures per
/// asset without consuming them.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The fetched document is not a valid manifest.
    #[error("failed to parse manifest from {url}: {reason}")]
    ManifestParse { url: String, reason: String },

    /// Downloaded or existing bytes do not match the declared checksum.
    #[error("checksum mismatch for {key}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    /// Local file I/O failed.
    #[error("I/O error for {path}: {reason}")]
    Io { path: PathBuf, reason: String },
}

/// Result of fetching one asset.
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    /// The asset as it now exists on disk.
    pub record: AssetRecord,

    /// `true` if the bytes were downloaded by this call, `false` if the
    /// asset was already present locally.
    pub is_new: bool,
}

/// Resolves a source locator to a parsed manifest.
pub trait ManifestFetcher: Send + Sync {
    /// Fetch and parse the manifest at `url`.
    fn fetch_manifest(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Manifest, FetchError>> + Send;
}

/// Resolves one asset descriptor to local bytes.
///
/// Implementations decide whether the asset is already present (by content
/// key) and report that via [`FetchedAsset::is_new`]; the loader treats the
/// two success shapes identically except for bookkeeping.
pub trait AssetFetcher: Send + Sync {
    /// Ensure the asset exists under `destination`, downloading if needed.
    fn fetch_asset(
        &self,
        asset: &AssetDescriptor,
        destination: &Path,
    ) -> impl Future<Output = Result<FetchedAsset, FetchError>> + Send;
}
