//! Content-addressed disk asset fetcher.

use std::path::Path;

use tracing::{debug, warn};

use super::checksum::{calculate_checksum, calculate_file_checksum};
use super::http::AsyncHttpClient;
use super::{AssetFetcher, FetchError, FetchedAsset};
use crate::manifest::AssetDescriptor;
use crate::update::AssetRecord;

/// Downloads assets into a content-addressed directory.
///
/// Each asset lives at `<destination>/<key>`. A file that is already
/// present counts as existing (no transfer); when the descriptor declares a
/// checksum the existing file is verified first, and a mismatch triggers a
/// redownload. Fresh downloads are written to a temporary file and renamed
/// into place so a crashed fetch never leaves a half-written asset under
/// its final name.
///
/// This is the sole home of new-vs-existing policy: the loader re-dispatches
/// every asset of a non-ready update and relies on this determination to
/// avoid redundant transfer.
pub struct DiskAssetFetcher<C: AsyncHttpClient> {
    http_client: C,
}

impl<C: AsyncHttpClient> DiskAssetFetcher<C> {
    /// Creates a new disk asset fetcher.
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }

    async fn existing_is_valid(&self, path: &Path, asset: &AssetDescriptor) -> bool {
        match &asset.checksum {
            None => true,
            Some(expected) => match calculate_file_checksum(path).await {
                Ok(actual) if actual == *expected => true,
                Ok(actual) => {
                    warn!(
                        key = %asset.key,
                        expected = %expected,
                        actual = %actual,
                        "existing asset failed checksum verification; redownloading"
                    );
                    false
                }
                Err(e) => {
                    warn!(key = %asset.key, error = %e, "could not verify existing asset; redownloading");
                    false
                }
            },
        }
    }

    async fn download(
        &self,
        asset: &AssetDescriptor,
        destination: &Path,
        path: &Path,
    ) -> Result<(), FetchError> {
        tokio::fs::create_dir_all(destination)
            .await
            .map_err(|e| FetchError::Io {
                path: destination.to_path_buf(),
                reason: e.to_string(),
            })?;

        let body = self.http_client.get(&asset.url).await?;

        if let Some(expected) = &asset.checksum {
            let actual = calculate_checksum(&body);
            if actual != *expected {
                return Err(FetchError::ChecksumMismatch {
                    key: asset.key.clone(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        let partial = destination.join(format!("{}.partial", asset.key));
        tokio::fs::write(&partial, &body)
            .await
            .map_err(|e| FetchError::Io {
                path: partial.clone(),
                reason: e.to_string(),
            })?;
        tokio::fs::rename(&partial, path)
            .await
            .map_err(|e| FetchError::Io {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        debug!(key = %asset.key, bytes = body.len(), "asset downloaded");
        Ok(())
    }
}

impl<C: AsyncHttpClient> AssetFetcher for DiskAssetFetcher<C> {
    async fn fetch_asset(
        &self,
        asset: &AssetDescriptor,
        destination: &Path,
    ) -> Result<FetchedAsset, FetchError> {
        let path = destination.join(&asset.key);

        let record = AssetRecord {
            key: asset.key.clone(),
            url: asset.url.clone(),
            is_launch_asset: asset.is_launch_asset,
            path: path.clone(),
        };

        let exists = tokio::fs::try_exists(&path).await.unwrap_or(false);
        if exists && self.existing_is_valid(&path, asset).await {
            debug!(key = %asset.key, "asset already present");
            return Ok(FetchedAsset {
                record,
                is_new: false,
            });
        }

        self.download(asset, destination, &path).await?;
        Ok(FetchedAsset {
            record,
            is_new: true,
        })
    }
}
