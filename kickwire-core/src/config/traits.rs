//! Configuration traits for validation and environment overrides.

use crate::error::ConfigError;

/// Trait for types that can be validated.
///
/// # Example
///
/// ```rust
/// use kickwire_core::config::Validatable;
/// use kickwire_core::error::ConfigError;
///
/// struct PusherConfig {
///     app_key: String,
/// }
///
/// impl Validatable for PusherConfig {
///     fn validate(&self) -> Result<(), ConfigError> {
///         if self.app_key.is_empty() {
///             return Err(ConfigError::missing_field("app_key"));
///         }
///         Ok(())
///     }
/// }
///
/// assert!(PusherConfig { app_key: String::new() }.validate().is_err());
/// ```
pub trait Validatable {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Trait for types that support environment variable overrides.
///
/// Implementors read values through `lookup` so overrides can be exercised
/// without touching the process environment.
pub trait Configurable: Sized {
    /// Applies overrides for every variable under `prefix` that `lookup` returns.
    fn apply_overrides(
        &mut self,
        prefix: &str,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError>;

    /// Returns the environment variable names that can override this configuration.
    fn env_var_names(prefix: &str) -> Vec<String>;

    /// Applies overrides from the process environment.
    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        self.apply_overrides(prefix, &|name| std::env::var(name).ok())
    }
}
