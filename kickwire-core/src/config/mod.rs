//! Configuration management module.
//!
//! - YAML, TOML, and JSON configuration files, detected by extension
//! - Validation with descriptive error messages
//! - Environment variable overrides
//!
//! # Example
//!
//! ```rust,ignore
//! use kickwire_core::config::{ConfigLoader, ConfigFormat};
//!
//! let config: MyConfig = ConfigLoader::new()
//!     .with_env_prefix("KICKWIRE")
//!     .load_file("kickwire.toml")?;
//! ```

mod loader;
mod traits;

pub use loader::{ConfigFormat, ConfigLoader};
pub use traits::{Configurable, Validatable};
