//! Engine configuration.
//!
//! Loaded from TOML; every key is optional.
//!
//! ```toml
//! cron_messages = "compatible"
//! normalize_path_separators = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// How cron parse failures are worded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CronMessages {
    /// Append the parser's reason to the message.
    #[default]
    Detailed,
    /// Only say that the value must be a valid cron expression.
    Compatible,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Wording of cron errors.
    pub cron_messages: CronMessages,
    /// Treat `\` as a path separator when looking for `..` segments.
    pub normalize_path_separators: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cron_messages: CronMessages::Detailed,
            normalize_path_separators: true,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a TOML config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_toml_str("").expect("empty config");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.cron_messages, CronMessages::Detailed);
        assert!(config.normalize_path_separators);
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_toml_str(
            "cron_messages = \"compatible\"\nnormalize_path_separators = false\n",
        )
        .expect("config");
        assert_eq!(config.cron_messages, CronMessages::Compatible);
        assert!(!config.normalize_path_separators);
    }

    #[test]
    fn test_rejects_unknown_style() {
        let err = EngineConfig::from_toml_str("cron_messages = \"loud\"").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("kubefield.toml");
        std::fs::write(&path, "cron_messages = \"compatible\"\n").expect("write");

        let config = EngineConfig::from_path(&path).expect("config");
        assert_eq!(config.cron_messages, CronMessages::Compatible);

        let missing = EngineConfig::from_path(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(missing, EngineError::ConfigIo { .. }));
    }
}
