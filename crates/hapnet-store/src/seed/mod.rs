//! Network seed import
//!
//! Provides:
//! - Seed Format v0 schema (haplotypes, facts, edges)
//! - YAML parser with validation
//! - Digest canonicalization
//! - Importer that writes the network tables in one transaction

pub mod digest;
pub mod format_v0;
pub mod importer;
pub mod parser;

pub use digest::compute_seed_digest;
pub use format_v0::NetworkSeedV0;
pub use importer::{import_seed, import_seed_str, SeedImportSummary};
pub use parser::{
    parse_seed_file, parse_seed_file_with_db, parse_seed_str, parse_seed_str_with_db,
};
