//! The load session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use super::barrier::{AssetBarrier, AssetBuckets, AssetOutcome};
use super::{LoaderConfig, LoaderError};
use crate::fetch::{AssetFetcher, ManifestFetcher};
use crate::manifest::Manifest;
use crate::store::UpdateStore;
use crate::update::{AssetRecord, UpdateRecord, UpdateStatus};

/// Owns one attempt to load a remote update into local storage.
///
/// A loader is single-use: [`start`](RemoteLoader::start) runs exactly one
/// load session, and a second call fails immediately with
/// [`LoaderError::AlreadyStarted`] without disturbing the session in
/// flight. Create a new instance to load again or to load several sources
/// in parallel.
///
/// All session-local state (the adopted update, the outcome buckets, the
/// barrier) lives in the body of one `start` call - constructed fresh per
/// attempt, never aliased across sessions.
pub struct RemoteLoader<M, A, S> {
    manifest_fetcher: M,
    asset_fetcher: Arc<A>,
    store: Arc<S>,
    config: LoaderConfig,
    started: AtomicBool,
}

impl<M, A, S> RemoteLoader<M, A, S>
where
    M: ManifestFetcher,
    A: AssetFetcher + 'static,
    S: UpdateStore + 'static,
{
    /// Creates a loader over the given collaborators.
    pub fn new(manifest_fetcher: M, asset_fetcher: A, store: Arc<S>, config: LoaderConfig) -> Self {
        Self {
            manifest_fetcher,
            asset_fetcher: Arc::new(asset_fetcher),
            store,
            config,
            started: AtomicBool::new(false),
        }
    }

    /// Run one load session against `manifest_url`.
    ///
    /// After the manifest downloads, `on_manifest` decides whether to
    /// continue; returning `false` ends the session successfully with
    /// `Ok(None)` ("caller declined"), having performed no reconciliation,
    /// downloads, or persistence writes.
    ///
    /// On `Ok(Some(update))` the update and all successfully fetched assets
    /// are persisted. Partial asset failure is not session failure: the
    /// update is returned with a non-ready status, which signals "retry the
    /// whole load later".
    pub async fn start<F>(
        &self,
        manifest_url: &str,
        on_manifest: F,
    ) -> Result<Option<UpdateRecord>, LoaderError>
    where
        F: FnOnce(&Manifest) -> bool,
    {
        if self.started.swap(true, Ordering::SeqCst) {
            error!("start called on a loader that already started a load");
            return Err(LoaderError::AlreadyStarted);
        }

        info!(url = manifest_url, "starting update load");
        let manifest = match self.manifest_fetcher.fetch_manifest(manifest_url).await {
            Ok(manifest) => manifest,
            Err(e) => {
                error!(url = manifest_url, error = %e, "manifest fetch failed");
                return Err(LoaderError::ManifestFetch(e));
            }
        };

        if !on_manifest(&manifest) {
            info!(update_id = %manifest.update_id(), "load declined after manifest download");
            return Ok(None);
        }

        self.process_manifest(manifest).await
    }

    async fn process_manifest(
        &self,
        manifest: Manifest,
    ) -> Result<Option<UpdateRecord>, LoaderError> {
        let id = manifest.update_id();

        let update = match self.store.load_update(&id)? {
            Some(existing) if existing.is_ready() => {
                // Already fully downloaded; nothing to dispatch.
                info!(update_id = %id, "update already downloaded and ready");
                return Ok(Some(existing));
            }
            Some(existing) => {
                // A previous session got partway through this update. Adopt
                // the row and download every asset again; the asset fetcher
                // decides per key what actually needs transferring.
                debug!(update_id = %id, "adopting existing pending update");
                existing
            }
            None => {
                let record = manifest.update_record();
                self.store.insert_update(&record)?;
                debug!(update_id = %id, "inserted new pending update");
                record
            }
        };

        let buckets = self.download_all_assets(&manifest).await?;
        self.finalize(update, buckets)
    }

    async fn download_all_assets(&self, manifest: &Manifest) -> Result<AssetBuckets, LoaderError> {
        let assets = manifest.asset_list();
        let expected = assets.len();

        // A manifest always carries at least its launch asset.
        if expected == 0 {
            return Ok(AssetBuckets::default());
        }

        debug!(
            expected,
            max_concurrent = self.config.effective_concurrency(),
            "dispatching asset downloads"
        );

        let (barrier, completion) = AssetBarrier::new(expected);
        let barrier = Arc::new(barrier);
        let semaphore = Arc::new(Semaphore::new(self.config.effective_concurrency()));

        for descriptor in assets {
            let barrier = Arc::clone(&barrier);
            let semaphore = Arc::clone(&semaphore);
            let fetcher = Arc::clone(&self.asset_fetcher);
            let destination = self.config.updates_dir.clone();

            tokio::spawn(async move {
                let record = AssetRecord {
                    key: descriptor.key.clone(),
                    url: descriptor.url.clone(),
                    is_launch_asset: descriptor.is_launch_asset,
                    path: destination.join(&descriptor.key),
                };

                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        // The semaphore is never closed; account for the
                        // asset anyway so the barrier cannot stall.
                        barrier.record(AssetOutcome::Failed(record));
                        return;
                    }
                };

                match fetcher.fetch_asset(&descriptor, &destination).await {
                    Ok(fetched) if fetched.is_new => {
                        barrier.record(AssetOutcome::New(fetched.record));
                    }
                    Ok(fetched) => {
                        barrier.record(AssetOutcome::Existing(fetched.record));
                    }
                    Err(e) => {
                        warn!(
                            key = %descriptor.key,
                            url = %descriptor.url,
                            error = %e,
                            "failed to download asset"
                        );
                        barrier.record(AssetOutcome::Failed(record));
                    }
                }
            });
        }

        // Only the download tasks hold the barrier now; if every task dies
        // without completing it, the channel closes instead of stalling.
        drop(barrier);

        completion.await.map_err(|_| {
            error!("asset barrier closed before completing");
            LoaderError::Internal("asset barrier closed before completing".to_string())
        })
    }

    /// Persist the session outcome in one step and decide readiness.
    fn finalize(
        &self,
        mut update: UpdateRecord,
        buckets: AssetBuckets,
    ) -> Result<Option<UpdateRecord>, LoaderError> {
        self.store.insert_assets(&buckets.new_assets, &update.id)?;
        for asset in &buckets.existing {
            self.store
                .link_existing_asset(&update.id, &asset.key, asset.is_launch_asset)?;
        }

        if buckets.failed.is_empty() {
            self.store.mark_ready(&update.id)?;
            update.status = UpdateStatus::Ready;
        } else {
            warn!(
                update_id = %update.id,
                failed = buckets.failed.len(),
                "update left pending; not all assets downloaded"
            );
        }

        info!(
            update_id = %update.id,
            status = %update.status,
            new = buckets.new_assets.len(),
            existing = buckets.existing.len(),
            failed = buckets.failed.len(),
            "update load finalized"
        );
        Ok(Some(update))
    }
}
