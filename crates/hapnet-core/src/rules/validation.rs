use crate::errors::{Result, ValidationError};
use crate::model::{
    Environment, FactValue, PayloadDraft, SnapshotPayload, Topology, WeightBounds, WeightRange,
};
use crate::network::Network;
use std::collections::BTreeMap;

/// Resolve a caller draft into a payload that is valid for `network`
///
/// Runs the snapshot checks in order and stops at the first violation:
///
/// 1. Every topology key names a haplotype in the network
/// 2. Unset weight bounds take the network's current edge-weight extrema
/// 3. The resolved range is ordered and lies within those extrema
/// 4. Every environment attribute is a known fact attribute, and every
///    non-null value belongs to that attribute's value domain
///
/// # Errors
/// - `UnknownHaplotype`, `InvalidWeightRange`, `UnknownAttribute`,
///   `UnknownAttributeValue` for the first violation found
/// - `InvalidInput` for a non-finite topology position
/// - any error the network itself reports
pub fn resolve<N: Network + ?Sized>(draft: PayloadDraft, network: &N) -> Result<SnapshotPayload> {
    check_topology(&draft.topology, network)?;
    let weight_range = resolve_weight_range(draft.weight_range, network)?;
    check_weight_range(weight_range, network)?;
    check_environments(&draft.environments, network)?;

    Ok(SnapshotPayload {
        topology: draft.topology,
        weight_range,
        environments: draft.environments,
        hap_sql: draft.hap_sql,
    })
}

/// Validate an already-resolved payload against `network`
///
/// Same checks as [`resolve`] without default substitution. A payload
/// without a weight range is accepted: it was resolved against a network
/// that had no edges.
///
/// # Errors
/// See [`resolve`].
pub fn validate<N: Network + ?Sized>(payload: &SnapshotPayload, network: &N) -> Result<()> {
    check_topology(&payload.topology, network)?;
    if payload.weight_range.is_some() {
        check_weight_range(payload.weight_range, network)?;
    }
    check_environments(&payload.environments, network)
}

/// Resolve caller weight bounds against the network's edge-weight extrema
///
/// A range is only taken as given when both bounds are set. If either bound
/// is missing the whole range is replaced by the network extrema, so
/// `(Some(4.0), None)` becomes `(network_min, network_max)`. With no edges in
/// the network an incomplete range resolves to `None`.
///
/// # Errors
/// - `InvalidWeightRange` when both bounds are given for a network without
///   edges
pub fn resolve_weight_range<N: Network + ?Sized>(
    bounds: WeightBounds,
    network: &N,
) -> Result<Option<WeightRange>> {
    let extrema = network.edge_weight_extrema()?;
    match (bounds.min, bounds.max, extrema) {
        (Some(min), Some(max), Some(_)) => Ok(Some(WeightRange::new(min, max))),
        (Some(min), Some(max), None) => {
            Err(ValidationError::InvalidWeightRange { min, max }.into())
        }
        (_, _, extrema) => Ok(extrema.map(|(lo, hi)| WeightRange::new(lo, hi))),
    }
}

fn check_topology<N: Network + ?Sized>(topology: &Topology, network: &N) -> Result<()> {
    for (hap_id, position) in topology {
        if !network.haplotype_exists(hap_id)? {
            return Err(ValidationError::UnknownHaplotype {
                hap_id: hap_id.clone(),
            }
            .into());
        }
        if !position.is_finite() {
            return Err(ValidationError::NonFinitePosition {
                hap_id: hap_id.clone(),
            }
            .into());
        }
    }
    Ok(())
}

fn check_weight_range<N: Network + ?Sized>(range: Option<WeightRange>, network: &N) -> Result<()> {
    let Some(range) = range else {
        return Ok(());
    };
    let valid = match network.edge_weight_extrema()? {
        Some((lo, hi)) => range.is_within(lo, hi),
        None => false,
    };
    if !valid {
        return Err(ValidationError::InvalidWeightRange {
            min: range.min,
            max: range.max,
        }
        .into());
    }
    Ok(())
}

fn check_environments<N: Network + ?Sized>(environments: &[Environment], network: &N) -> Result<()> {
    if environments.iter().all(|env| env.attributes.is_empty()) {
        return Ok(());
    }

    let names = network.fact_attribute_names()?;
    let mut domains: BTreeMap<&str, Vec<FactValue>> = BTreeMap::new();

    for env in environments {
        for (name, value) in &env.attributes {
            if !names.contains(name) {
                return Err(ValidationError::UnknownAttribute { name: name.clone() }.into());
            }
            if value.is_null() {
                continue;
            }
            if !domains.contains_key(name.as_str()) {
                domains.insert(name.as_str(), network.fact_attribute_values(name)?);
            }
            let domain = &domains[name.as_str()];
            if !domain.is_empty() && !domain.iter().any(|known| values_match(known, value)) {
                return Err(ValidationError::UnknownAttributeValue {
                    name: name.clone(),
                    value: display_value(value),
                }
                .into());
            }
        }
    }
    Ok(())
}

/// Numbers compare by value so an integer column matches `1.0`
fn values_match(known: &FactValue, candidate: &FactValue) -> bool {
    match (known.as_f64(), candidate.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => known == candidate,
    }
}

fn display_value(value: &FactValue) -> String {
    match value {
        FactValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use crate::network::InMemoryNetwork;
    use serde_json::json;

    fn network() -> InMemoryNetwork {
        InMemoryNetwork::new()
            .with_haplotype("h1")
            .with_haplotype("h2")
            .with_fact("h1", [("color", json!("red")), ("count", json!(2))])
            .with_fact("h2", [("color", json!("blue")), ("note", json!(null))])
            .with_edge(3.0, ["h1", "h2"])
            .with_edge(7.0, ["h2", "h1"])
    }

    #[test]
    fn test_partial_bounds_take_full_extrema() {
        let low_only = WeightBounds {
            min: Some(4.0),
            max: None,
        };
        let high_only = WeightBounds {
            min: None,
            max: Some(5.0),
        };
        for bounds in [low_only, high_only] {
            let range = resolve_weight_range(bounds, &network()).unwrap();
            assert_eq!(range, Some(WeightRange::new(3.0, 7.0)));
        }
    }

    #[test]
    fn test_partial_bounds_without_edges_resolve_to_none() {
        let bounds = WeightBounds {
            min: Some(4.0),
            max: None,
        };
        assert_eq!(
            resolve_weight_range(bounds, &InMemoryNetwork::new()).unwrap(),
            None
        );
    }

    #[test]
    fn test_null_attribute_value_resolves_unchanged() {
        let draft = PayloadDraft::new()
            .with_environment(Environment::new(true).with_attribute("color", FactValue::Null));
        let payload = resolve(draft, &network()).unwrap();
        assert_eq!(
            crate::codec::decode(&crate::codec::encode(&payload).unwrap()).unwrap(),
            payload
        );
    }

    #[test]
    fn test_explicit_bounds_without_edges_rejected() {
        let err = resolve_weight_range(WeightBounds::new(1.0, 2.0), &InMemoryNetwork::new())
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidWeightRange);
    }

    #[test]
    fn test_integer_domain_matches_float_value() {
        let draft = PayloadDraft::new()
            .with_environment(Environment::new(true).with_attribute("count", json!(2.0)));
        assert!(resolve(draft, &network()).is_ok());
    }

    #[test]
    fn test_unrestricted_attribute_accepts_any_value() {
        let draft = PayloadDraft::new()
            .with_environment(Environment::new(false).with_attribute("note", "anything"));
        assert!(resolve(draft, &network()).is_ok());
    }

    #[test]
    fn test_unknown_value_message_is_unquoted() {
        let draft = PayloadDraft::new()
            .with_environment(Environment::new(true).with_attribute("color", "green"));
        let err = resolve(draft, &network()).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::UnknownAttributeValue);
        assert_eq!(
            err.message(),
            "Invalid value 'green' for fact attribute 'color'"
        );
    }
}
