//! Core types shared across HapNet facilities
//!
//! This crate provides the canonical schema constants used by the logging
//! facility and by error reporting:
//!
//! - **Field keys**: component, op, event, duration and entity identifiers
//! - **Event names**: operation start, end and error boundaries

pub mod schema;
