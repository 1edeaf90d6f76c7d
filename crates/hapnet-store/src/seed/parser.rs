//! Seed parser with validation
//!
//! Parses YAML and validates schema version, haplotype uniqueness, edge
//! shape and referential integrity

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, seed_validation, Result};
use crate::seed::format_v0::NetworkSeedV0;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parse a seed file from a path
pub fn parse_seed_file(path: &Path) -> Result<NetworkSeedV0> {
    parse_seed_file_with_db(path, None)
}

/// Parse a seed file, resolving references against haplotypes already in
/// the database
pub fn parse_seed_file_with_db(path: &Path, conn: Option<&Connection>) -> Result<NetworkSeedV0> {
    let content = fs::read_to_string(path)
        .map_err(|e| seed_validation(&format!("Failed to read seed file: {}", e)))?;

    parse_seed_str_with_db(&content, conn)
}

/// Parse a seed from a string
pub fn parse_seed_str(content: &str) -> Result<NetworkSeedV0> {
    parse_seed_str_with_db(content, None)
}

/// Parse a seed from a string with optional database context
pub fn parse_seed_str_with_db(content: &str, conn: Option<&Connection>) -> Result<NetworkSeedV0> {
    let seed: NetworkSeedV0 = serde_yaml::from_str(content)
        .map_err(|e| seed_validation(&format!("YAML parse error: {}", e)))?;

    validate_seed(&seed, conn)?;

    Ok(seed)
}

fn validate_seed(seed: &NetworkSeedV0, conn: Option<&Connection>) -> Result<()> {
    if seed.schema_version != 0 {
        return Err(seed_validation(&format!(
            "Unsupported schema_version: {}. Expected 0",
            seed.schema_version
        )));
    }

    let mut hap_ids: HashSet<&str> = HashSet::new();
    for hap in &seed.haplotypes {
        if hap.id.trim().is_empty() {
            return Err(seed_validation("Haplotype id cannot be empty"));
        }
        if !hap_ids.insert(hap.id.as_str()) {
            return Err(seed_validation(&format!(
                "Duplicate haplotype id: {}",
                hap.id
            )));
        }
        if stored_haplotype_exists(conn, &hap.id)? {
            return Err(seed_validation(&format!(
                "Haplotype already exists: {}",
                hap.id
            )));
        }
    }

    let known = |hap_id: &str| -> Result<bool> {
        Ok(hap_ids.contains(hap_id) || stored_haplotype_exists(conn, hap_id)?)
    };

    for fact in &seed.facts {
        if !known(&fact.hap_id)? {
            return Err(seed_validation(&format!(
                "Fact references non-existent haplotype: {}",
                fact.hap_id
            )));
        }
        if let Some((name, _)) = fact
            .attributes
            .iter()
            .find(|(_, value)| value.is_array() || value.is_object())
        {
            return Err(seed_validation(&format!(
                "Fact attribute '{}' on haplotype {} must be a scalar",
                name, fact.hap_id
            )));
        }
    }

    for (index, edge) in seed.edges.iter().enumerate() {
        if !edge.weight.is_finite() {
            return Err(seed_validation(&format!(
                "Edge {} has a non-finite weight",
                index
            )));
        }
        if edge.haps.len() < 2 {
            return Err(seed_validation(&format!(
                "Edge {} must join at least two haplotypes",
                index
            )));
        }
        for hap_id in &edge.haps {
            if !known(hap_id)? {
                return Err(seed_validation(&format!(
                    "Edge {} references non-existent haplotype: {}",
                    index, hap_id
                )));
            }
        }
    }

    Ok(())
}

fn stored_haplotype_exists(conn: Option<&Connection>, hap_id: &str) -> Result<bool> {
    let Some(conn) = conn else {
        return Ok(false);
    };
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM haplotypes WHERE hap_id = ?1",
            [hap_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;
    Ok(found.is_some())
}
