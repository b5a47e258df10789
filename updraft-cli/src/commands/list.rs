//! `updraft list` - list persisted updates.

use std::path::PathBuf;

use updraft::store::{JsonUpdateStore, UpdateStore};
use updraft::update::UpdateRecord;

use crate::error::CliError;

/// Render one update as a listing line.
fn format_update(update: &UpdateRecord) -> String {
    format!(
        "{}  {:<12} {:<8} {:<8} {}",
        update.id,
        format!("v{}", update.version),
        update.status.to_string(),
        update.channel.as_deref().unwrap_or("-"),
        update.created_at.to_rfc3339(),
    )
}

/// List all persisted updates, newest first.
pub fn run(store_path: PathBuf) -> Result<(), CliError> {
    let store = JsonUpdateStore::open(&store_path)?;

    let mut updates = store.list_updates()?;
    if updates.is_empty() {
        println!("no updates persisted in {}", store_path.display());
        return Ok(());
    }

    updates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    for update in &updates {
        println!("{}", format_update(update));
    }

    Ok(())
}
