pub mod payload;

pub use payload::{
    Environment, FactValue, PayloadDraft, Position, SnapshotPayload, Topology, WeightBounds,
    WeightRange,
};
