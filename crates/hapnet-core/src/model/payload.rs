use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A fact attribute value as stored in the network (JSON scalar)
pub type FactValue = serde_json::Value;

/// Node layout: haplotype id to 2D position
pub type Topology = BTreeMap<String, Position>;

/// 2D position of a haplotype in the exploration view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Resolved edge-weight display range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightRange {
    pub min: f64,
    pub max: f64,
}

impl WeightRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `min <= max` and both bounds lie within `[lo, hi]`.
    ///
    /// NaN bounds never satisfy this.
    pub fn is_within(&self, lo: f64, hi: f64) -> bool {
        self.min <= self.max && self.min >= lo && self.max <= hi
    }
}

/// Caller-supplied weight bounds; unset bounds default to the network's
/// current edge-weight extrema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightBounds {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl WeightBounds {
    /// Both bounds unset
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn is_unset(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

impl From<WeightRange> for WeightBounds {
    fn from(range: WeightRange) -> Self {
        Self::new(range.min, range.max)
    }
}

/// An environment filter: an active flag plus attribute constraints.
///
/// A `null` value means "attribute present, any value". There is no other
/// way to spell it, so a stored environment decodes to exactly what was
/// encoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub active: bool,
    #[serde(default)]
    pub attributes: BTreeMap<String, FactValue>,
}

impl Environment {
    pub fn new(active: bool) -> Self {
        Self {
            active,
            attributes: BTreeMap::new(),
        }
    }

    /// Constrain `name` to `value`
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<FactValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Mention `name` without constraining its value
    pub fn with_any(mut self, name: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), FactValue::Null);
        self
    }
}

/// The exploration state captured by a version.
///
/// `weight_range` is `None` only when the network had no edges at the
/// time the payload was resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPayload {
    pub topology: Topology,
    pub weight_range: Option<WeightRange>,
    pub environments: Vec<Environment>,
    pub hap_sql: String,
}

/// Unresolved exploration state as supplied by a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadDraft {
    pub topology: Topology,
    pub weight_range: WeightBounds,
    pub environments: Vec<Environment>,
    pub hap_sql: String,
}

impl PayloadDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, hap_id: impl Into<String>, x: f64, y: f64) -> Self {
        self.topology.insert(hap_id.into(), Position::new(x, y));
        self
    }

    pub fn with_weight_range(mut self, min: f64, max: f64) -> Self {
        self.weight_range = WeightBounds::new(min, max);
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environments.push(environment);
        self
    }

    pub fn with_hap_sql(mut self, hap_sql: impl Into<String>) -> Self {
        self.hap_sql = hap_sql.into();
        self
    }
}
