//! Updraft CLI - command-line interface to the update loader.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use updraft::log::{init_logging, LogConfig};

use commands::{default_assets_dir, default_store_path};

#[derive(Parser)]
#[command(name = "updraft", version, about = "Download and manage application updates")]
struct Cli {
    /// Log filter when RUST_LOG is unset (e.g. "debug", "updraft=trace").
    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load an update from a manifest URL into the local store.
    Load {
        /// URL of the update manifest.
        manifest_url: String,

        /// Directory for downloaded asset files.
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Path of the store index.
        #[arg(long)]
        store: Option<PathBuf>,

        /// Maximum concurrent asset downloads.
        #[arg(long, default_value_t = 4)]
        max_concurrent: usize,

        /// Fetch and print the manifest, then decline the download.
        #[arg(long)]
        manifest_only: bool,
    },

    /// List persisted updates.
    List {
        /// Path of the store index.
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Show one update and its assets.
    Show {
        /// Id of the update to show.
        update_id: String,

        /// Path of the store index.
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let _guard = init_logging(&LogConfig::default().with_filter(cli.log.clone()));

    let result = match cli.command {
        Commands::Load {
            manifest_url,
            dir,
            store,
            max_concurrent,
            manifest_only,
        } => {
            commands::load::run(commands::load::LoadArgs {
                manifest_url,
                assets_dir: dir.unwrap_or_else(default_assets_dir),
                store_path: store.unwrap_or_else(default_store_path),
                max_concurrent,
                manifest_only,
            })
            .await
        }

        Commands::List { store } => {
            commands::list::run(store.unwrap_or_else(default_store_path))
        }

        Commands::Show { update_id, store } => {
            commands::show::run(update_id, store.unwrap_or_else(default_store_path))
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
