//! `updraft show` - inspect one update and its assets.

use std::path::PathBuf;

use updraft::store::{JsonUpdateStore, UpdateStore};
use updraft::update::UpdateId;

use crate::error::CliError;

/// Print one update and the assets linked to it.
pub fn run(update_id: String, store_path: PathBuf) -> Result<(), CliError> {
    let store = JsonUpdateStore::open(&store_path)?;
    let id = UpdateId::new(update_id);

    let update = store
        .load_update(&id)?
        .ok_or_else(|| CliError::NotFound(id.to_string()))?;

    println!("id:         {}", update.id);
    println!("version:    {}", update.version);
    println!("channel:    {}", update.channel.as_deref().unwrap_or("-"));
    println!("created at: {}", update.created_at.to_rfc3339());
    println!("status:     {}", update.status);

    let assets = store.assets_for_update(&id)?;
    println!("assets:     {}", assets.len());
    for asset in &assets {
        println!(
            "  {} {} -> {}",
            if asset.is_launch_asset { "*" } else { " " },
            asset.key,
            asset.path.display(),
        );
    }

    Ok(())
}
