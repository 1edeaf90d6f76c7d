//! Versioned snapshots of exploration state
//!
//! An append-only ledger: each version stores a tag, a comment, a creation
//! time and an encoded payload. Versions are never updated or deleted.

mod bootstrap;
mod model;
mod query;
mod store;

pub use bootstrap::{INITIAL_COMMENT, INITIAL_TAG};
pub use model::{NewVersion, Version, VersionIdentity, VersionInfo, VersionMatcher};
pub use query::{VersionInfos, Versions};
pub use store::VersionStore;
