//! Engine configuration
//!
//! Loads from explicit values or from `PIIGUARD_*` environment variables.
//!
//! ## Environment Variables
//! - `PIIGUARD_VALIDATION_ENABLED`: checksum validation toggle (true/false)
//! - `PIIGUARD_LOAD_BUILTINS`: preload the built-in catalog (true/false)

/// Construction-time options for [`crate::Engine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// When false, regex matches are accepted without checksum validation.
    pub validation_enabled: bool,
    /// When false, the engine starts with an empty registry.
    pub load_builtins: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { validation_enabled: true, load_builtins: true }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            validation_enabled: env_bool("PIIGUARD_VALIDATION_ENABLED", defaults.validation_enabled),
            load_builtins: env_bool("PIIGUARD_LOAD_BUILTINS", defaults.load_builtins),
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            other => {
                tracing::debug!(key, value = other, "unparseable boolean, using default");
                default
            }
        },
        Err(_) => default,
    }
}
