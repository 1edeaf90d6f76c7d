//! Seed Format v0 schema
//!
//! Defines the YAML structure of a haplotype network seed:
//!
//! ```yaml
//! schema_version: 0
//! haplotypes:
//!   - id: h1
//!     attributes: { population: north }
//! facts:
//!   - hap_id: h1
//!     attributes: { color: red }
//! edges:
//!   - weight: 3.0
//!     haps: [h1, h2]
//! ```

use hapnet_core::model::FactValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level seed file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSeedV0 {
    /// Schema version (must be 0 for this format)
    pub schema_version: u32,

    #[serde(default)]
    pub haplotypes: Vec<SeedHaplotype>,

    #[serde(default)]
    pub facts: Vec<SeedFact>,

    #[serde(default)]
    pub edges: Vec<SeedEdge>,
}

/// Haplotype definition in seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedHaplotype {
    /// Haplotype ID; numeric YAML scalars are accepted and kept as text
    #[serde(deserialize_with = "deserialize_hap_id")]
    pub id: String,

    /// Free-form descriptive attributes
    #[serde(default)]
    pub attributes: BTreeMap<String, FactValue>,
}

/// Fact attribute values observed on one haplotype
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedFact {
    #[serde(deserialize_with = "deserialize_hap_id")]
    pub hap_id: String,

    /// Scalar values; `null` declares the attribute without a value
    #[serde(default)]
    pub attributes: BTreeMap<String, FactValue>,
}

/// Weighted edge joining two or more haplotypes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedEdge {
    pub weight: f64,

    #[serde(deserialize_with = "deserialize_hap_ids")]
    pub haps: Vec<String>,
}

/// Newtype so the scalar visitor can be reused for sequences
struct HapId(String);

impl<'de> Deserialize<'de> for HapId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct HapIdVisitor;

        impl<'de> Visitor<'de> for HapIdVisitor {
            type Value = HapId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a haplotype id (string or integer)")
            }

            fn visit_str<E>(self, value: &str) -> Result<HapId, E>
            where
                E: de::Error,
            {
                Ok(HapId(value.to_string()))
            }

            fn visit_i64<E>(self, value: i64) -> Result<HapId, E>
            where
                E: de::Error,
            {
                Ok(HapId(value.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<HapId, E>
            where
                E: de::Error,
            {
                Ok(HapId(value.to_string()))
            }
        }

        deserializer.deserialize_any(HapIdVisitor)
    }
}

fn deserialize_hap_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    HapId::deserialize(deserializer).map(|id| id.0)
}

fn deserialize_hap_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Vec::<HapId>::deserialize(deserializer).map(|ids| ids.into_iter().map(|id| id.0).collect())
}
