//! CLI commands for loading and inspecting updates.

pub mod list;
pub mod load;
pub mod show;

use std::path::PathBuf;

/// Root of the default data directory (`~/.local/share/updraft` on Linux).
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("updraft")
}

/// Default path of the JSON store index.
pub fn default_store_path() -> PathBuf {
    default_data_dir().join("store.json")
}

/// Default directory for downloaded asset files.
pub fn default_assets_dir() -> PathBuf {
    default_data_dir().join("assets")
}
