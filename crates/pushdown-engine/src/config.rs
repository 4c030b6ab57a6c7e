//! Engine configuration: feature flags loaded from TOML.
//!
//! ```toml
//! [features]
//! enhanced_delegation = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Prefer a bound entity's own sort metadata when it supports array lookup.
    #[serde(default)]
    pub enhanced_delegation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub features: FeatureFlags,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid engine config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tables_default_to_disabled_features() {
        let config = EngineConfig::from_toml_str("").expect("empty config");
        assert!(!config.features.enhanced_delegation);

        let config = EngineConfig::from_toml_str("[features]\nenhanced_delegation = true\n")
            .expect("features table");
        assert!(config.features.enhanced_delegation);
    }

    #[test]
    fn unknown_tables_and_bad_types_are_rejected() {
        assert!(matches!(
            EngineConfig::from_toml_str("[engine]\nthreads = 4\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("[features]\nenhanced_delegation = \"yes\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reports_missing_files_with_their_path() {
        let err = EngineConfig::load("/nonexistent/pushdown.toml").expect_err("missing file");
        assert!(err.to_string().contains("/nonexistent/pushdown.toml"));
    }
}
