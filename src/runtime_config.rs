//! # Runtime Configuration Module
//!
//! Environment-driven defaults for building models.
//!
//! ## Environment Variables
//!
//! ### `EDMB_NAMESPACE`
//!
//! Namespace applied to unqualified type names (`Customer` becomes
//! `<namespace>.Customer`) when a model document does not declare one.
//!
//! Default: `Default`
//!
//! ### `EDMB_STRICT`
//!
//! When `true`, structural validation issues (missing keys, unresolved
//! property types) fail model loading. When `false` they are logged as
//! warnings and the model is still returned.
//!
//! Default: `true`
//!
//! ## Usage
//!
//! ```rust
//! use edmbuilder::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Namespace: {}", config.namespace);
//! ```

use crate::model::DEFAULT_NAMESPACE;
use std::env;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Namespace for unqualified type names (default: `Default`)
    pub namespace: String,
    /// Fail model loading on structural validation issues (default: `true`)
    pub strict: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            namespace: DEFAULT_NAMESPACE.to_string(),
            strict: true,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Separated from `from_env` so tests do not have to mutate the process environment.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = RuntimeConfig::default();
        let namespace = lookup("EDMB_NAMESPACE")
            .map(|ns| ns.trim().to_string())
            .filter(|ns| !ns.is_empty())
            .unwrap_or(defaults.namespace);
        let strict = lookup("EDMB_STRICT")
            .and_then(|val| parse_bool(&val))
            .unwrap_or(defaults.strict);
        RuntimeConfig { namespace, strict }
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]), RuntimeConfig::default());
        assert_eq!(config(&[]).namespace, "Default");
    }

    #[test]
    fn test_overrides() {
        let c = config(&[("EDMB_NAMESPACE", " Contoso.Models "), ("EDMB_STRICT", "off")]);
        assert_eq!(c.namespace, "Contoso.Models");
        assert!(!c.strict);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let c = config(&[("EDMB_NAMESPACE", "  "), ("EDMB_STRICT", "maybe")]);
        assert_eq!(c, RuntimeConfig::default());
    }
}
