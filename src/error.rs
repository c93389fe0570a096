//! Error types for config persistence and metric logging.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by [`crate::config::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("i/o error on config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{origin} does not contain a JSON object")]
    NotAnObject { origin: String },

    #[error("missing config key '{0}'")]
    MissingKey(String),

    #[error("config key '{key}' is not a valid {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("config conversion failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures raised by [`crate::logger::RunningLogger`].
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("i/o error on log file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
