// Two connections to one database file racing on the same tag

mod common;

use common::{v1_draft, SCENARIO_SEED};
use hapnet_core::ExErrorKind;
use hapnet_store::seed::import_seed_str;
use hapnet_store::{NewVersion, VersionStore};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_same_tag_race_has_one_winner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");

    {
        let mut store = VersionStore::open(&path).unwrap();
        import_seed_str(SCENARIO_SEED, store.connection_mut()).unwrap();
    }

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = ["first", "second"]
        .into_iter()
        .map(|hap_sql| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut store = VersionStore::open(&path).unwrap();
                barrier.wait();
                store.save(NewVersion::new("race", v1_draft().with_hap_sql(hap_sql)))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let wins = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.kind() == ExErrorKind::DuplicateTag))
        .count();
    assert_eq!(wins, 1, "results: {:?}", results);
    assert_eq!(duplicates, 1, "results: {:?}", results);

    let store = VersionStore::open(&path).unwrap();
    assert_eq!(store.count().unwrap(), 2);
}

#[test]
fn test_reader_sees_committed_versions_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");

    let mut writer = VersionStore::open(&path).unwrap();
    import_seed_str(SCENARIO_SEED, writer.connection_mut()).unwrap();
    let reader = VersionStore::open(&path).unwrap();

    let identity = writer.save(NewVersion::new("v1", v1_draft())).unwrap();
    assert_eq!(reader.latest().unwrap().info(), identity);
    assert_eq!(reader.count().unwrap(), 2);
}
