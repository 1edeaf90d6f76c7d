// Integration tests for network seed import and the SQLite network view

mod common;

use common::SCENARIO_SEED;
use hapnet_core::{ExErrorKind, Network};
use hapnet_store::migrations::apply_migrations;
use hapnet_store::seed::{compute_seed_digest, import_seed, import_seed_str, parse_seed_str};
use hapnet_store::SqliteNetwork;
use rusqlite::Connection;
use serde_json::json;
use std::collections::BTreeSet;

fn setup_test_db() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    apply_migrations(&mut conn).unwrap();
    conn
}

#[test]
fn test_import_populates_network() {
    let mut conn = setup_test_db();
    let summary = import_seed_str(SCENARIO_SEED, &mut conn).unwrap();
    assert_eq!(summary.haplotypes, 2);
    assert_eq!(summary.facts, 2);
    assert_eq!(summary.edges, 2);
    assert_eq!(
        summary.digest,
        compute_seed_digest(&parse_seed_str(SCENARIO_SEED).unwrap())
    );

    let network = SqliteNetwork::new(&conn);
    assert!(network.haplotype_exists("h1").unwrap());
    assert!(!network.haplotype_exists("h9").unwrap());
    assert_eq!(network.edge_weight_extrema().unwrap(), Some((3.0, 7.0)));
    assert_eq!(
        network.fact_attribute_names().unwrap(),
        BTreeSet::from(["color".to_string()])
    );

    let mut colors = network.fact_attribute_values("color").unwrap();
    colors.sort_by_key(|v| v.to_string());
    assert_eq!(colors, vec![json!("blue"), json!("red")]);
    assert_eq!(network.haplotype_count().unwrap(), 2);
    assert_eq!(network.edge_count().unwrap(), 2);
}

#[test]
fn test_null_fact_declares_unrestricted_attribute() {
    let mut conn = setup_test_db();
    import_seed_str(
        "schema_version: 0\nhaplotypes: [{id: h1}]\nfacts: [{hap_id: h1, attributes: {note: null}}]\n",
        &mut conn,
    )
    .unwrap();

    let network = SqliteNetwork::new(&conn);
    assert!(network.fact_attribute_names().unwrap().contains("note"));
    assert!(network.fact_attribute_values("note").unwrap().is_empty());
}

#[test]
fn test_later_seed_may_reference_stored_haplotypes() {
    let mut conn = setup_test_db();
    import_seed_str(SCENARIO_SEED, &mut conn).unwrap();

    import_seed_str(
        "schema_version: 0\nhaplotypes: [{id: h3}]\nedges: [{weight: 11, haps: [h1, h3]}]\n",
        &mut conn,
    )
    .unwrap();

    let network = SqliteNetwork::new(&conn);
    assert_eq!(network.edge_weight_extrema().unwrap(), Some((3.0, 11.0)));
}

#[test]
fn test_reimporting_haplotype_rejected() {
    let mut conn = setup_test_db();
    import_seed_str(SCENARIO_SEED, &mut conn).unwrap();

    let err = import_seed_str(SCENARIO_SEED, &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert!(err.message().contains("already exists"));
}

#[test]
fn test_invalid_seed_writes_nothing() {
    let mut conn = setup_test_db();
    let yaml = "schema_version: 0\nhaplotypes: [{id: h1}, {id: h2}]\nedges: [{weight: .nan, haps: [h1, h2]}]\n";

    let err = import_seed_str(yaml, &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert!(err.message().contains("non-finite"));

    let network = SqliteNetwork::new(&conn);
    assert_eq!(network.haplotype_count().unwrap(), 0);
}

#[test]
fn test_import_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("network.yaml");
    std::fs::write(&path, SCENARIO_SEED).unwrap();

    let mut conn = setup_test_db();
    let summary = import_seed(&path, &mut conn).unwrap();
    assert_eq!(summary.haplotypes, 2);
}

#[test]
fn test_missing_file_is_reported() {
    let mut conn = setup_test_db();
    let err = import_seed(std::path::Path::new("/nonexistent/seed.yaml"), &mut conn).unwrap_err();
    assert!(err.message().contains("Failed to read seed file"));
}
