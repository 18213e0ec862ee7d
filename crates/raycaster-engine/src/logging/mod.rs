//! Logging setup.
//!
//! The crate logs through the `log` facade only; this module installs
//! `env_logger` once for binaries and embedding hosts that want it.

mod init;

pub use init::{init_logging, LoggingConfig};
