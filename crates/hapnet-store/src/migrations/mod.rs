//! Embedded schema migrations
//!
//! `apply_migrations` brings a connection up to the current schema: the
//! network tables first, then the versions table. Each applied migration is
//! recorded in `schema_version` with the SHA-256 of its SQL.

mod checksums;
mod embedded;
mod runner;

pub use checksums::compute_checksum;
pub use embedded::{get_migrations, Migration};
pub use runner::apply_migrations;
