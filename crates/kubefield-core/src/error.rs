use std::path::PathBuf;

use thiserror::Error;

/// Faults outside the validator boundary: wiring a field to a rule that does
/// not exist, or loading a broken configuration. Validation problems in
/// values are never reported through this type.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    #[error("Invalid parameter for rule {rule}: {reason}")]
    InvalidRuleParameter { rule: String, reason: String },

    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
