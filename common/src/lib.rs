//! # Shared Building Blocks
//!
//! Types and helpers used by both the scan engine (`portscan-core`) and the
//! command line front-end (`portscan-cli`).
//!
//! * **[`config`]**: Scan request and display configuration.
//! * **[`error`]**: The error taxonomy surfaced before a scan starts.
//! * **[`network`]**: Port sets and the service-name table.
//! * **[`log`]**: Logging macros shared across crates.

pub mod config;
pub mod error;
pub mod log;
pub mod network;
