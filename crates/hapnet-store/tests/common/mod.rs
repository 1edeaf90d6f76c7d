#![allow(dead_code)]

use hapnet_core::model::{Environment, FactValue, PayloadDraft};
use hapnet_core::InMemoryNetwork;
use hapnet_store::seed::import_seed_str;
use hapnet_store::VersionStore;

/// h1/h2, color in {red, blue}, edge weights 3 and 7
pub const SCENARIO_SEED: &str = r#"
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

pub fn scenario_network() -> InMemoryNetwork {
    InMemoryNetwork::new()
        .with_haplotype("h1")
        .with_haplotype("h2")
        .with_fact("h1", [("color", FactValue::from("red"))])
        .with_fact("h2", [("color", FactValue::from("blue"))])
        .with_edge(3.0, ["h1", "h2"])
        .with_edge(7.0, ["h2", "h1"])
}

/// In-memory store with the scenario network imported after bootstrap
pub fn scenario_store() -> VersionStore {
    let mut store = VersionStore::open_in_memory().unwrap();
    import_seed_str(SCENARIO_SEED, store.connection_mut()).unwrap();
    store
}

pub fn v1_draft() -> PayloadDraft {
    PayloadDraft::new()
        .with_position("h1", 0.0, 0.0)
        .with_position("h2", 1.0, 1.0)
        .with_weight_range(3.0, 7.0)
        .with_environment(Environment::new(true).with_attribute("color", "red"))
}
