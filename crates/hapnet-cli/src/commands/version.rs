//! Version commands
//!
//! Usage:
//!   hapnet version save --tag <TAG> [--comment <TEXT>] [--payload <FILE>]
//!   hapnet version get [--id <N> | --tag <TAG> | --at <RFC3339>]
//!   hapnet version list | count | dump

use crate::GlobalArgs;
use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Args, Subcommand};
use hapnet_core::PayloadDraft;
use hapnet_store::{NewVersion, VersionMatcher};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct VersionArgs {
    #[command(subcommand)]
    pub command: VersionCommand,
}

#[derive(Debug, Subcommand)]
pub enum VersionCommand {
    /// Save the exploration state in a payload file as a new version
    Save(SaveArgs),
    /// Print one version as JSON (latest by default)
    Get(GetArgs),
    /// List id, creation time and tag of every version
    List,
    /// Print the number of versions
    Count,
    /// Print every version as one JSON object per line
    Dump,
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    #[arg(long)]
    pub tag: String,

    #[arg(long, default_value = "")]
    pub comment: String,

    /// JSON file with topology, weight_range, environments and hap_sql;
    /// missing fields take their defaults
    #[arg(long)]
    pub payload: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    #[arg(long, conflicts_with_all = ["tag", "at"])]
    pub id: Option<i64>,

    #[arg(long, conflicts_with = "at")]
    pub tag: Option<String>,

    /// Exact creation time, e.g. 2024-05-01T12:00:00.000001Z
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

impl GetArgs {
    fn matcher(self) -> VersionMatcher {
        match (self.id, self.tag, self.at) {
            (Some(id), _, _) => VersionMatcher::Id(id),
            (_, Some(tag), _) => VersionMatcher::Tag(tag),
            (_, _, Some(at)) => VersionMatcher::CreatedAt(at),
            _ => VersionMatcher::Latest,
        }
    }
}

pub fn execute(global: &GlobalArgs, args: VersionArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        VersionCommand::Save(save_args) => execute_save(global, save_args),
        VersionCommand::Get(get_args) => execute_get(global, get_args),
        VersionCommand::List => execute_list(global),
        VersionCommand::Count => execute_count(global),
        VersionCommand::Dump => execute_dump(global),
    }
}

fn execute_save(global: &GlobalArgs, args: SaveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let draft: PayloadDraft = match &args.payload {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)
            .map_err(|e| format!("Invalid payload file {}: {}", path.display(), e))?,
        None => PayloadDraft::default(),
    };

    let mut store = global.open_store()?;
    let identity = store.save(NewVersion::new(args.tag, draft).with_comment(args.comment))?;

    println!(
        "✓ Saved version {} '{}' at {}",
        identity.id,
        identity.tag,
        format_time(identity.created_at)
    );
    Ok(())
}

fn execute_get(global: &GlobalArgs, args: GetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = global.open_store()?;
    let version = store.get(args.matcher())?;
    println!("{}", serde_json::to_string_pretty(&version)?);
    Ok(())
}

fn execute_list(global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = global.open_store()?;
    for info in store.infos() {
        let info = info?;
        println!("{}\t{}\t{}", info.id, format_time(info.created_at), info.tag);
    }
    Ok(())
}

fn execute_count(global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = global.open_store()?;
    println!("{}", store.count()?);
    Ok(())
}

fn execute_dump(global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = global.open_store()?;
    for version in store.all() {
        println!("{}", serde_json::to_string(&version?)?);
    }
    Ok(())
}

fn format_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
