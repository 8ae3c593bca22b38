use serde::{Deserialize, Serialize};

/// Registry behaviour switches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// When `true`, creations are rejected unless the id falls inside its
    /// kind's listing range (`e…`, `d…`, `c…`). Off by default: ids are
    /// unconstrained and records outside the ranges are simply not listed.
    pub enforce_key_spaces: bool,
}

impl RegistryConfig {
    /// Configuration that confines every kind to its own key range.
    pub fn strict() -> Self {
        Self {
            enforce_key_spaces: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_permissive() {
        assert!(!RegistryConfig::default().enforce_key_spaces);
        assert!(RegistryConfig::strict().enforce_key_spaces);
    }

    #[test]
    fn missing_fields_default() {
        let config: RegistryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RegistryConfig::default());
    }
}
