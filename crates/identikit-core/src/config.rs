//! Editor configuration
//!
//! Every field has a default, so a config file only needs to name the
//! settings it changes.

use crate::error::ConfigError;
use crate::layer::WidthRange;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An RGBA color
pub type Rgba = [u8; 4];

/// Top-level editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Artboard surface settings
    pub artboard: ArtboardConfig,
    /// Values given to freshly added layers
    pub layer_defaults: LayerDefaults,
    /// Range every layer width is clamped into
    pub width_range: WidthRange,
    /// Where a duplicated layer lands in stack order
    pub duplicate_placement: DuplicatePlacement,
    /// Whether a click on empty canvas clears the selection
    pub clear_selection_on_empty_click: bool,
    /// Reference template overlay
    pub template: TemplateConfig,
    /// Export settings
    pub export: ExportConfig,
}

impl EditorConfig {
    /// Load a configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Fixed-size artboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtboardConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Background fill (may be transparent)
    pub background: Rgba,
}

impl Default for ArtboardConfig {
    fn default() -> Self {
        Self {
            width: 720,
            height: 540,
            background: [255, 255, 255, 255],
        }
    }
}

/// Initial transform for newly added layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerDefaults {
    /// Top-left position
    pub position: [f64; 2],
    /// Width
    pub width: f64,
}

impl Default for LayerDefaults {
    fn default() -> Self {
        Self {
            position: [50.0, 50.0],
            width: 100.0,
        }
    }
}

/// Stack placement of a duplicated layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePlacement {
    /// Directly above the source layer
    #[default]
    AboveSource,
    /// At the bottom of the stack
    Bottom,
}

/// Whether the template paints beneath or above the layers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplatePlacement {
    /// Between the background and the first layer
    #[default]
    Beneath,
    /// Over every layer
    Above,
}

/// Initial template overlay state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub enabled: bool,
    pub opacity: f32,
    pub placement: TemplatePlacement,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            opacity: 0.25,
            placement: TemplatePlacement::Beneath,
        }
    }
}

/// Export pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Whether an enabled template appears in exported bitmaps
    pub include_template: bool,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// Download file name without extension
    pub file_stem: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_template: false,
            jpeg_quality: 92,
            file_stem: "sketch".to_string(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            artboard: ArtboardConfig::default(),
            layer_defaults: LayerDefaults::default(),
            width_range: WidthRange::default(),
            duplicate_placement: DuplicatePlacement::default(),
            clear_selection_on_empty_click: true,
            template: TemplateConfig::default(),
            export: ExportConfig::default(),
        }
    }
}
