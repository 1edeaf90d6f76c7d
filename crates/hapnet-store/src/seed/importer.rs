//! Seed importer orchestration
//!
//! Writes a validated network seed into the network tables

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::seed::format_v0::NetworkSeedV0;
use crate::seed::{compute_seed_digest, parse_seed_file_with_db, parse_seed_str_with_db};
use hapnet_core::errors::{ExError, ExErrorKind};
use hapnet_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::{params, Connection, Transaction};
use std::path::Path;
use std::time::Instant;

/// What a seed import wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedImportSummary {
    pub digest: String,
    pub haplotypes: usize,
    pub facts: usize,
    pub edges: usize,
}

/// Import a seed file into the database
///
/// 1. Parses and validates the seed YAML (references may name haplotypes
///    already stored)
/// 2. Computes the seed digest
/// 3. Inserts haplotypes, facts and edges in one transaction
pub fn import_seed(path: &Path, conn: &mut Connection) -> Result<SeedImportSummary> {
    let seed = parse_seed_file_with_db(path, Some(&*conn))?;
    import_parsed(&seed, conn)
}

/// Import a seed held in memory
pub fn import_seed_str(content: &str, conn: &mut Connection) -> Result<SeedImportSummary> {
    let seed = parse_seed_str_with_db(content, Some(&*conn))?;
    import_parsed(&seed, conn)
}

fn import_parsed(seed: &NetworkSeedV0, conn: &mut Connection) -> Result<SeedImportSummary> {
    let start = Instant::now();
    let digest = compute_seed_digest(seed);
    log_op_start!("seed_import", seed_digest = %digest);

    let result = conn
        .transaction()
        .map_err(from_rusqlite)
        .and_then(|tx| {
            write_seed(&tx, seed)?;
            tx.commit().map_err(from_rusqlite)
        })
        .map(|()| SeedImportSummary {
            digest,
            haplotypes: seed.haplotypes.len(),
            facts: seed.facts.len(),
            edges: seed.edges.len(),
        });

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(summary) => log_op_end!(
            "seed_import",
            duration_ms = duration_ms,
            haplotypes = summary.haplotypes,
            facts = summary.facts,
            edges = summary.edges
        ),
        Err(e) => log_op_error!("seed_import", e, duration_ms = duration_ms),
    }
    result
}

fn write_seed(tx: &Transaction<'_>, seed: &NetworkSeedV0) -> Result<()> {
    for hap in &seed.haplotypes {
        tx.execute(
            "INSERT INTO haplotypes (hap_id, attributes_json) VALUES (?1, ?2)",
            params![hap.id, to_json(&hap.attributes)?],
        )
        .map_err(from_rusqlite)?;
    }

    for fact in &seed.facts {
        tx.execute("INSERT INTO facts (hap_id) VALUES (?1)", [&fact.hap_id])
            .map_err(from_rusqlite)?;
        let fact_id = tx.last_insert_rowid();
        for (name, value) in &fact.attributes {
            tx.execute(
                "INSERT INTO fact_attributes (fact_id, name, value_json) VALUES (?1, ?2, ?3)",
                params![fact_id, name, to_json(value)?],
            )
            .map_err(from_rusqlite)?;
        }
    }

    for edge in &seed.edges {
        tx.execute("INSERT INTO edges (weight) VALUES (?1)", [edge.weight])
            .map_err(from_rusqlite)?;
        let edge_id = tx.last_insert_rowid();
        for (position, hap_id) in edge.haps.iter().enumerate() {
            tx.execute(
                "INSERT INTO edge_haplotypes (edge_id, position, hap_id) VALUES (?1, ?2, ?3)",
                params![edge_id, position as i64, hap_id],
            )
            .map_err(from_rusqlite)?;
        }
    }

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("seed_import")
            .with_message(format!("Failed to serialize seed value: {}", e))
    })
}
