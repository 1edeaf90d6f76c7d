//! Structured logging for the version store
//!
//! `init(profile)` installs the global subscriber; call it once from the
//! binary. Library code only emits events through the `log_op_*` macros, so
//! every create, lookup and seed import reports its start, end and failure
//! with the same field keys.
//!
//! ```rust
//! use hapnet_core::logging_facility::{init, Profile};
//!
//! init(Profile::Production);
//! hapnet_core::log_op_start!("create_version", tag = "v1");
//! ```
//!
//! Tests use [`init_test_capture`] instead and assert on the recorded events.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
