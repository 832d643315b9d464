use crate::error::{RequestError, Result};
use serde::Deserialize;
use std::time::Duration;

/// Engine tuning knobs.
///
/// Loaded from TOML by embedders; every field has a default so an empty
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Seconds a confirmed-absent identity stays in the negative cache.
    pub negative_cache_timeout: u64,
    /// Character standing in for spaces in externally visible names.
    /// Lookup keys have it turned back into spaces before hitting the store.
    pub override_space: Option<char>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            negative_cache_timeout: 15,
            override_space: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| RequestError::configuration(e.to_string()))
    }

    pub fn negative_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.negative_cache_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.negative_cache_ttl(), Duration::from_secs(15));
        assert_eq!(config.override_space, None);
    }

    #[test]
    fn test_empty_document() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_full_document() {
        let config = EngineConfig::from_toml_str(
            r#"
            negative_cache_timeout = 60
            override_space = "_"
            "#,
        )
        .unwrap();
        assert_eq!(config.negative_cache_timeout, 60);
        assert_eq!(config.override_space, Some('_'));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = EngineConfig::from_toml_str("entry_cache = 10").unwrap_err();
        assert!(matches!(err, RequestError::Configuration(_)));
    }
}
