use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read settings from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse settings from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("environment value '{name}' is invalid: {reason}")]
    Env { name: String, reason: String },

    #[error("missing required setting '{field}'")]
    Missing { field: &'static str },

    #[error("server '{server}' is missing required field '{field}'")]
    ServerField {
        server: String,
        field: &'static str,
    },
}
