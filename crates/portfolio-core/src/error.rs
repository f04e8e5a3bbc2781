use thiserror::Error;

use crate::actions::ActionStatus;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read governance file {path}: {source}")]
    GovernanceFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse governance file: {0}")]
    GovernanceFileParse(#[from] serde_yaml::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("readiness range is inverted: min {min} > max {max}")]
    InvertedRange { min: f64, max: f64 },

    #[error("readiness bound {value} is outside 0..=100")]
    OutOfRange { value: f64 },

    #[error("invalid value for filter parameter {key}: {reason}")]
    InvalidParam { key: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("cannot move action {action_id} from {from} to {to}")]
    InvalidTransition {
        action_id: String,
        from: ActionStatus,
        to: ActionStatus,
    },
}
