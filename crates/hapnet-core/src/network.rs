//! Read-only view of the haplotype network.
//!
//! Snapshot validation only needs four questions answered by the network;
//! this trait is that seam. `InMemoryNetwork` answers them from owned data,
//! the store crate answers them from its SQLite tables.

use crate::errors::Result;
use crate::model::FactValue;
use std::collections::{BTreeMap, BTreeSet};

/// The network queries snapshot validation depends on
pub trait Network {
    /// Whether a haplotype with this id exists
    fn haplotype_exists(&self, hap_id: &str) -> Result<bool>;

    /// Minimum and maximum edge weight, or `None` when there are no edges
    fn edge_weight_extrema(&self) -> Result<Option<(f64, f64)>>;

    /// Names of all fact attributes
    fn fact_attribute_names(&self) -> Result<BTreeSet<String>>;

    /// Known non-null values of a fact attribute; empty means unrestricted
    fn fact_attribute_values(&self, name: &str) -> Result<Vec<FactValue>>;
}

impl<N: Network + ?Sized> Network for &N {
    fn haplotype_exists(&self, hap_id: &str) -> Result<bool> {
        (**self).haplotype_exists(hap_id)
    }

    fn edge_weight_extrema(&self) -> Result<Option<(f64, f64)>> {
        (**self).edge_weight_extrema()
    }

    fn fact_attribute_names(&self) -> Result<BTreeSet<String>> {
        (**self).fact_attribute_names()
    }

    fn fact_attribute_values(&self, name: &str) -> Result<Vec<FactValue>> {
        (**self).fact_attribute_values(name)
    }
}

/// A fact: attribute values observed on one haplotype
#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    pub hap_id: String,
    pub attributes: BTreeMap<String, FactValue>,
}

/// An edge between two or more haplotypes
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub weight: f64,
    pub haps: Vec<String>,
}

/// A network held entirely in memory
///
/// # Example
///
/// ```
/// use hapnet_core::model::FactValue;
/// use hapnet_core::network::{InMemoryNetwork, Network};
///
/// let network = InMemoryNetwork::new()
///     .with_haplotype("h1")
///     .with_haplotype("h2")
///     .with_fact("h1", [("color", FactValue::from("red"))])
///     .with_edge(3.0, ["h1", "h2"]);
///
/// assert!(network.haplotype_exists("h1").unwrap());
/// assert_eq!(network.edge_weight_extrema().unwrap(), Some((3.0, 3.0)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryNetwork {
    haplotypes: BTreeSet<String>,
    facts: Vec<Fact>,
    edges: Vec<Edge>,
}

impl InMemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_haplotype(mut self, hap_id: impl Into<String>) -> Self {
        self.haplotypes.insert(hap_id.into());
        self
    }

    /// Attach a fact to a haplotype. Null values declare the attribute
    /// without widening its domain.
    pub fn with_fact<I, K>(mut self, hap_id: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, FactValue)>,
        K: Into<String>,
    {
        self.facts.push(Fact {
            hap_id: hap_id.into(),
            attributes: attributes
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        });
        self
    }

    pub fn with_edge<I, S>(mut self, weight: f64, haps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edges.push(Edge {
            weight,
            haps: haps.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

impl Network for InMemoryNetwork {
    fn haplotype_exists(&self, hap_id: &str) -> Result<bool> {
        Ok(self.haplotypes.contains(hap_id))
    }

    fn edge_weight_extrema(&self) -> Result<Option<(f64, f64)>> {
        Ok(self.edges.iter().fold(None, |acc, edge| match acc {
            None => Some((edge.weight, edge.weight)),
            Some((lo, hi)) => Some((lo.min(edge.weight), hi.max(edge.weight))),
        }))
    }

    fn fact_attribute_names(&self) -> Result<BTreeSet<String>> {
        Ok(self
            .facts
            .iter()
            .flat_map(|fact| fact.attributes.keys().cloned())
            .collect())
    }

    fn fact_attribute_values(&self, name: &str) -> Result<Vec<FactValue>> {
        let mut domain: Vec<FactValue> = Vec::new();
        for value in self.facts.iter().filter_map(|f| f.attributes.get(name)) {
            if !value.is_null() && !domain.contains(value) {
                domain.push(value.clone());
            }
        }
        Ok(domain)
    }
}
