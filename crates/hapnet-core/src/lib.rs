//! HapNet Core - exploration snapshots of a haplotype network
//!
//! This crate provides the storage-independent half of the version store:
//! - Snapshot payload model (topology, weight range, environments, query)
//! - Deterministic payload codec
//! - The read-only `Network` seam and an in-memory implementation
//! - Snapshot validation against the network
//! - Canonical error and logging facilities

pub mod codec;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod network;
pub mod rules;

/// Re-exported so the logging macros resolve schema constants from any crate
pub use hapnet_core_types as core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, Result, ValidationError, VersionError};
pub use model::{Environment, PayloadDraft, Position, SnapshotPayload, WeightBounds, WeightRange};
pub use network::{InMemoryNetwork, Network};
