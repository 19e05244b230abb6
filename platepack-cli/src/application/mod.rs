pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use platepack_core::error::Result;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Pack {
            root,
            manifest,
            batch_id,
            size_cap,
        } => handlers::handle_pack(root, manifest, batch_id, size_cap),
        Commands::Validate { root, manifest } => handlers::handle_validate(root, manifest),
        Commands::Plan {
            root,
            batch_id,
            size_cap,
        } => handlers::handle_plan(root, batch_id, size_cap),
    }
}
