//! Seed import command
//!
//! Usage: hapnet seed import <PATH> [--db <FILE>]

use crate::GlobalArgs;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub command: SeedCommand,
}

#[derive(Debug, Subcommand)]
pub enum SeedCommand {
    /// Import a network seed file (or a directory of them) into the store
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to seed YAML file or directory
    pub path: PathBuf,
}

/// Execute seed command
pub fn execute(global: &GlobalArgs, args: SeedArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        SeedCommand::Import(import_args) => execute_import(global, import_args),
    }
}

fn execute_import(global: &GlobalArgs, args: ImportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = global.open_store()?;

    let seed_files = if args.path.is_dir() {
        // Sorted for determinism
        let mut files: Vec<PathBuf> = std::fs::read_dir(&args.path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        files
    } else {
        vec![args.path]
    };

    for seed_file in seed_files {
        println!("Importing {}...", seed_file.display());
        let summary = hapnet_store::seed::import_seed(&seed_file, store.connection_mut())?;
        println!(
            "✓ Imported {} haplotypes, {} facts, {} edges (digest: {})",
            summary.haplotypes, summary.facts, summary.edges, summary.digest
        );
    }

    Ok(())
}
