use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default per-archive size cap: 100 MiB.
pub const DEFAULT_SIZE_CAP: u64 = 100 * 1024 * 1024;

#[derive(Parser)]
#[command(author, version, about = "platepack batch packager", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack a batch directory into size-capped upload archives
    Pack {
        /// Batch root containing payload files and meta.csv
        root: PathBuf,

        /// Manifest path (defaults to meta.csv in the batch root)
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Identifier used in archive names (defaults to the root folder name)
        #[arg(long = "batch-id")]
        batch_id: Option<String>,

        /// Per-archive size cap in bytes
        #[arg(long = "size-cap", default_value_t = DEFAULT_SIZE_CAP)]
        size_cap: u64,
    },

    /// Validate the manifest without writing any archives
    Validate {
        /// Batch root (or any directory holding meta.csv)
        root: PathBuf,

        /// Manifest path (defaults to meta.csv in the batch root)
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// Show the planned group/part layout without writing anything
    Plan {
        /// Batch root containing payload files
        root: PathBuf,

        /// Identifier used in archive names (defaults to the root folder name)
        #[arg(long = "batch-id")]
        batch_id: Option<String>,

        /// Per-archive size cap in bytes
        #[arg(long = "size-cap", default_value_t = DEFAULT_SIZE_CAP)]
        size_cap: u64,
    },
}
