//! Error types for loading reference data and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading a reference catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Failed to read the catalog file.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog JSON is malformed.
    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors that can occur when loading filter configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error.
    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse error.
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}
