//! Seed digest canonicalization
//!
//! Computes a stable SHA256 digest of a network seed, independent of the
//! order in which haplotypes, facts and edges are listed.

use crate::seed::format_v0::NetworkSeedV0;
use hapnet_core::model::FactValue;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

#[derive(Serialize)]
struct CanonicalSeed<'a> {
    schema_version: u32,
    haplotypes: Vec<(&'a str, &'a BTreeMap<String, FactValue>)>,
    facts: Vec<String>,
    edges: Vec<String>,
}

/// Compute a stable digest for a seed
///
/// Returns a SHA256 hex digest of the canonicalized seed representation
pub fn compute_seed_digest(seed: &NetworkSeedV0) -> String {
    let mut haplotypes: Vec<_> = seed
        .haplotypes
        .iter()
        .map(|h| (h.id.as_str(), &h.attributes))
        .collect();
    haplotypes.sort_by(|a, b| a.0.cmp(b.0));

    // Facts and edges have no identity of their own: sort by rendered form
    let mut facts: Vec<String> = seed
        .facts
        .iter()
        .map(|f| serde_json::json!([f.hap_id, f.attributes]).to_string())
        .collect();
    facts.sort();

    let mut edges: Vec<String> = seed
        .edges
        .iter()
        .map(|e| serde_json::json!([e.weight, e.haps]).to_string())
        .collect();
    edges.sort();

    let canonical = CanonicalSeed {
        schema_version: seed.schema_version,
        haplotypes,
        facts,
        edges,
    };

    let json = serde_json::to_string(&canonical).unwrap_or_default();
    hex::encode(Sha256::digest(json.as_bytes()))
}
