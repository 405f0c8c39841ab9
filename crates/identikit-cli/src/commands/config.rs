//! Config command

use identikit_core::{ConfigError, EditorConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default config location: `<config_dir>/identikit/config.json`
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("identikit")
        .join("config.json")
}

/// Load the effective configuration
///
/// An explicit path must exist. Without one, the default location is used
/// if present, otherwise the built-in defaults.
pub fn load(path: Option<&Path>) -> Result<EditorConfig, ConfigError> {
    if let Some(path) = path {
        info!("Loading config from {}", path.display());
        return EditorConfig::load(path);
    }

    let fallback = default_path();
    if fallback.is_file() {
        info!("Loading config from {}", fallback.display());
        EditorConfig::load(&fallback)
    } else {
        debug!(path = %fallback.display(), "No config file, using defaults");
        Ok(EditorConfig::default())
    }
}

pub fn run(path: Option<&Path>, defaults: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = if defaults {
        EditorConfig::default()
    } else {
        load(path)?
    };

    println!("{}", config.to_json_pretty()?);
    Ok(())
}
