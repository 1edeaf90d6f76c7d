//! CLI version integration tests
//!
//! Drive the `hapnet` binary against a temporary store file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const SEED: &str = r#"
schema_version: 0
haplotypes:
  - id: h1
  - id: h2
facts:
  - hap_id: h1
    attributes: { color: red }
  - hap_id: h2
    attributes: { color: blue }
edges:
  - weight: 3
    haps: [h1, h2]
  - weight: 7
    haps: [h2, h1]
"#;

const V1_PAYLOAD: &str = r#"{
  "topology": { "h1": { "x": 0, "y": 0 }, "h2": { "x": 1, "y": 1 } },
  "weight_range": { "min": 3, "max": 7 },
  "environments": [ { "active": true, "attributes": { "color": "red" } } ]
}"#;

fn hapnet(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hapnet"))
        .args(args)
        .args(["--db", db.to_str().unwrap()])
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Store with the seed imported, plus the path of a v1 payload file
fn setup(temp_dir: &TempDir) -> (PathBuf, PathBuf) {
    let db = temp_dir.path().join("store.db");
    let seed = temp_dir.path().join("network.yaml");
    let payload = temp_dir.path().join("v1.json");
    fs::write(&seed, SEED).unwrap();
    fs::write(&payload, V1_PAYLOAD).unwrap();

    let output = hapnet(&db, &["seed", "import", seed.to_str().unwrap()]);
    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("2 haplotypes"));

    (db, payload)
}

#[test]
fn test_cli_save_then_get() {
    let temp_dir = TempDir::new().unwrap();
    let (db, payload) = setup(&temp_dir);

    let output = hapnet(
        &db,
        &[
            "version",
            "save",
            "--tag",
            "v1",
            "--comment",
            "first",
            "--payload",
            payload.to_str().unwrap(),
        ],
    );
    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Saved version 2 'v1'"));

    let output = hapnet(&db, &["version", "get", "--tag", "v1"]);
    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    let version: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(version["id"], 2);
    assert_eq!(version["comment"], "first");
    assert_eq!(version["payload"]["weight_range"]["max"], 7.0);
    assert_eq!(
        version["payload"]["environments"][0]["attributes"]["color"],
        "red"
    );

    // Latest by default
    let output = hapnet(&db, &["version", "get"]);
    let latest: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(latest, version);
}

#[test]
fn test_cli_rejects_unchanged_payload() {
    let temp_dir = TempDir::new().unwrap();
    let (db, payload) = setup(&temp_dir);
    let payload = payload.to_str().unwrap();

    let first = hapnet(&db, &["version", "save", "--tag", "v1", "--payload", payload]);
    assert!(first.status.success(), "Stderr: {}", stderr(&first));

    let second = hapnet(&db, &["version", "save", "--tag", "v2", "--payload", payload]);
    assert!(!second.status.success());
    assert!(stderr(&second).contains("ERR_NO_CHANGE"));
}

#[test]
fn test_cli_rejects_unknown_haplotype() {
    let temp_dir = TempDir::new().unwrap();
    let (db, _) = setup(&temp_dir);
    let bad = temp_dir.path().join("bad.json");
    fs::write(&bad, r#"{"topology": {"h9": {"x": 0, "y": 0}}}"#).unwrap();

    let output = hapnet(
        &db,
        &["version", "save", "--tag", "v3", "--payload", bad.to_str().unwrap()],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("ERR_UNKNOWN_HAPLOTYPE"));
}

#[test]
fn test_cli_list_count_and_dump() {
    let temp_dir = TempDir::new().unwrap();
    let (db, payload) = setup(&temp_dir);
    let output = hapnet(
        &db,
        &["version", "save", "--tag", "v1", "--payload", payload.to_str().unwrap()],
    );
    assert!(output.status.success(), "Stderr: {}", stderr(&output));

    let count = hapnet(&db, &["version", "count"]);
    assert_eq!(stdout(&count).trim(), "2");

    let list = stdout(&hapnet(&db, &["version", "list"]));
    let tags: Vec<&str> = list
        .lines()
        .map(|line| line.rsplit('\t').next().unwrap())
        .collect();
    assert_eq!(tags, vec!["init", "v1"]);

    let dump = stdout(&hapnet(&db, &["version", "dump"]));
    let records: Vec<serde_json::Value> = dump
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["comment"], "-* AUTO CREATED *-");
}

#[test]
fn test_cli_get_missing_version_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("store.db");

    let output = hapnet(&db, &["version", "get", "--id", "99"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("ERR_NOT_FOUND"));
}

#[test]
fn test_cli_get_by_timestamp() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("store.db");

    let output = hapnet(&db, &["version", "get", "--id", "1"]);
    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    let init: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let created_at = init["created_at"].as_str().unwrap().to_string();

    let output = hapnet(&db, &["version", "get", "--at", &created_at]);
    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    let by_time: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(by_time, init);
}

#[test]
fn test_cli_seed_import_writes_network_tables() {
    let temp_dir = TempDir::new().unwrap();
    let (db, _) = setup(&temp_dir);

    let conn = rusqlite::Connection::open(&db).unwrap();
    let edges: i64 = conn
        .query_row("SELECT COUNT(*) FROM edges", [], |row| row.get(0))
        .unwrap();
    assert_eq!(edges, 2);
}
