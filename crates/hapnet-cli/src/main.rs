//! HapNet CLI
//!
//! Command-line interface for the haplotype network version store

use clap::{Args, Parser, Subcommand};
use hapnet_core::logging_facility::{self, Profile};
use hapnet_store::{StoreOptions, VersionStore};
use std::path::PathBuf;
use std::time::Duration;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "hapnet")]
#[command(about = "HapNet - Versioned haplotype network exploration", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Store database file
    #[arg(long, global = true, default_value = ".hapnet/store.db")]
    pub db: PathBuf,

    /// Log profile written to stderr (dev, prod, off); RUST_LOG overrides the filter
    #[arg(long, global = true, value_name = "PROFILE")]
    pub log: Option<Profile>,

    /// How long a write waits for another writer's lock
    #[arg(long, global = true, default_value_t = 5000)]
    pub busy_timeout_ms: u64,
}

impl GlobalArgs {
    pub fn open_store(&self) -> Result<VersionStore, Box<dyn std::error::Error>> {
        let options =
            StoreOptions::default().with_busy_timeout(Duration::from_millis(self.busy_timeout_ms));
        Ok(VersionStore::open_with_options(&self.db, options)?)
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Network seed import operations
    Seed(commands::seed::SeedArgs),
    /// Version save, lookup and history
    Version(commands::version::VersionArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Some(profile) = cli.global.log {
        logging_facility::init(profile);
    }

    let result = match cli.command {
        Commands::Seed(args) => commands::seed::execute(&cli.global, args),
        Commands::Version(args) => commands::version::execute(&cli.global, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
