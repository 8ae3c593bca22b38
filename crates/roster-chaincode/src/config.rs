use roster_registry::RegistryConfig;
use serde::{Deserialize, Serialize};

/// Application version written to `employee_ui` by `init`.
pub const DEFAULT_APP_VERSION: &str = "4.0.1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaincodeConfig {
    pub app_version: String,
    pub registry: RegistryConfig,
}

impl Default for ChaincodeConfig {
    fn default() -> Self {
        Self {
            app_version: DEFAULT_APP_VERSION.into(),
            registry: RegistryConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ChaincodeConfig::default();
        assert_eq!(c.app_version, "4.0.1");
        assert!(!c.registry.enforce_key_spaces);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: ChaincodeConfig =
            serde_json::from_str(r#"{"registry":{"enforce_key_spaces":true}}"#).unwrap();
        assert_eq!(c.app_version, DEFAULT_APP_VERSION);
        assert!(c.registry.enforce_key_spaces);
    }
}
