//! Error types for configuration and catalog loading
//!
//! Layer Store and selection operations never fail: unknown ids are no-ops
//! and out-of-range values are clamped.

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for this schema
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Catalog scanning errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog directory not found: {0}")]
    NotFound(String),

    #[error("Catalog directory has no categories: {0}")]
    Empty(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
