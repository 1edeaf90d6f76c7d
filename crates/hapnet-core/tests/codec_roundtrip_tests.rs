// Round-trip law for the payload codec: decode(encode(p)) == p

use hapnet_core::codec::{decode, encode};
use hapnet_core::model::{Environment, FactValue, Position, SnapshotPayload, WeightRange};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn finite() -> impl Strategy<Value = f64> {
    -1.0e9f64..1.0e9f64
}

fn fact_value() -> impl Strategy<Value = FactValue> {
    prop_oneof![
        Just(FactValue::Null),
        "[a-z]{1,8}".prop_map(FactValue::from),
        any::<i64>().prop_map(FactValue::from),
        finite().prop_map(FactValue::from),
        any::<bool>().prop_map(FactValue::from),
    ]
}

fn environment() -> impl Strategy<Value = Environment> {
    (
        any::<bool>(),
        prop::collection::btree_map("[a-z_]{1,10}", fact_value(), 0..4),
    )
        .prop_map(|(active, attributes)| Environment { active, attributes })
}

fn payload() -> impl Strategy<Value = SnapshotPayload> {
    (
        prop::collection::btree_map("h[0-9]{1,3}", (finite(), finite()), 0..8),
        prop::option::of((finite(), finite())),
        prop::collection::vec(environment(), 0..4),
        ".{0,40}",
    )
        .prop_map(|(topology, range, environments, hap_sql)| SnapshotPayload {
            topology: topology
                .into_iter()
                .map(|(id, xy)| (id, Position::from(xy)))
                .collect::<BTreeMap<_, _>>(),
            weight_range: range.map(|(a, b)| WeightRange::new(a.min(b), a.max(b))),
            environments,
            hap_sql,
        })
}

proptest! {
    #[test]
    fn prop_decode_inverts_encode(p in payload()) {
        let blob = encode(&p).unwrap();
        prop_assert_eq!(decode(&blob).unwrap(), p);
    }

    #[test]
    fn prop_equal_payloads_encode_identically(p in payload()) {
        let copy = p.clone();
        prop_assert_eq!(encode(&p).unwrap(), encode(&copy).unwrap());
    }
}

#[test]
fn test_empty_payload_round_trips() {
    let empty = SnapshotPayload::default();
    assert_eq!(decode(&encode(&empty).unwrap()).unwrap(), empty);
}
