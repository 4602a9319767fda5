//! # Kickwire Telemetry
//!
//! Logging setup for the Kickwire chat client.
//!
//! This crate provides:
//! - Structured logging with JSON and pretty formats
//! - Stdout and rolling file outputs
//!
//! Libraries in this workspace only emit `tracing` events; binaries call
//! [`logging::init_logging`] once at startup.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

/// Logging configuration and initialization
pub mod logging;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::logging::{LogConfig, LogFormat, LogOutput, LoggingError, init_logging};
}
