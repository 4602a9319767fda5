//! # Kickwire Core
//!
//! Core types, errors, and configuration for the Kickwire chat client.
//!
//! This crate provides:
//! - `NewType` wrappers for protocol identifiers (`ChatroomId`)
//! - Chat data structures (`ChatMessage`, `User`)
//! - Error types and handling framework
//! - Configuration loading with YAML/TOML/JSON support and environment variable overrides

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]

/// Core type definitions and `NewType` wrappers
pub mod types;

/// Chat data structures
pub mod data;

/// Error types and handling
pub mod error;

/// Configuration management
pub mod config;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::data::*;
    pub use crate::error::{KickwireError, Result};
    pub use crate::types::*;
}
