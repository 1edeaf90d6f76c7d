//! HapNet Store - SQLite persistence for network exploration versions
//!
//! Provides:
//! - SQLite connection management and embedded, checksummed migrations
//! - The haplotype network tables and a `Network` view over them
//! - Network seed import from YAML
//! - The append-only version store with bootstrap, lookups and history

pub mod db;
pub mod errors;
pub mod migrations;
pub mod network;
pub mod seed;
pub mod versions;

// Re-export key types
pub use db::StoreOptions;
pub use errors::Result;
pub use network::SqliteNetwork;
pub use versions::{NewVersion, Version, VersionInfo, VersionMatcher, VersionStore};
