//! `updraft load` - run one load session against a manifest URL.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;
use updraft::fetch::{DiskAssetFetcher, HttpManifestFetcher, ReqwestClient};
use updraft::loader::{LoaderConfig, RemoteLoader};
use updraft::store::JsonUpdateStore;

use crate::error::CliError;

/// Arguments for the `load` command.
pub struct LoadArgs {
    pub manifest_url: String,
    pub assets_dir: PathBuf,
    pub store_path: PathBuf,
    pub max_concurrent: usize,
    /// Fetch and print the manifest, then decline the download.
    pub manifest_only: bool,
}

/// Run one load session.
pub async fn run(args: LoadArgs) -> Result<(), CliError> {
    debug!(store = %args.store_path.display(), assets = %args.assets_dir.display(), "opening update store");
    let store = Arc::new(JsonUpdateStore::open(&args.store_path)?);

    let loader = RemoteLoader::new(
        HttpManifestFetcher::new(ReqwestClient::new()?),
        DiskAssetFetcher::new(ReqwestClient::new()?),
        Arc::clone(&store),
        LoaderConfig::new(args.assets_dir).with_max_concurrent_downloads(args.max_concurrent),
    );

    let manifest_only = args.manifest_only;
    let outcome = loader
        .start(&args.manifest_url, |manifest| {
            println!(
                "manifest: {} v{}{} ({} asset(s))",
                manifest.update_id(),
                manifest.version,
                manifest
                    .channel
                    .as_deref()
                    .map(|c| format!(" [{c}]"))
                    .unwrap_or_default(),
                manifest.asset_list().len(),
            );
            !manifest_only
        })
        .await?;

    match outcome {
        None => println!("manifest inspected; download declined"),
        Some(update) if update.is_ready() => {
            println!("update {} is ready to launch", update.id);
        }
        Some(update) => {
            println!(
                "update {} is not ready (some assets failed); run load again to retry",
                update.id
            );
        }
    }

    Ok(())
}
