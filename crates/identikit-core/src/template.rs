//! Reference template overlay
//!
//! The template is scene-level state, not a layer: it has no id, never
//! takes part in stack order, and never receives pointer input.

use crate::config::{TemplateConfig, TemplatePlacement};
use crate::layer::AssetRef;
use serde::Serialize;
use tracing::debug;

/// Image shown by the template overlay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum TemplateImage {
    /// Built-in face outline guide
    #[default]
    Default,
    /// An externally supplied image
    Asset(AssetRef),
}

/// Template overlay state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateOverlay {
    enabled: bool,
    opacity: f32,
    image: TemplateImage,
    placement: TemplatePlacement,
}

impl TemplateOverlay {
    /// Create an overlay from its configured initial state
    pub fn from_config(config: &TemplateConfig) -> Self {
        Self {
            enabled: config.enabled,
            opacity: config.opacity.clamp(0.0, 1.0),
            image: TemplateImage::Default,
            placement: config.placement,
        }
    }

    /// Whether the overlay is shown
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Opacity in `[0, 1]`
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Current image
    pub fn image(&self) -> &TemplateImage {
        &self.image
    }

    /// Paint position relative to the layers
    pub fn placement(&self) -> TemplatePlacement {
        self.placement
    }

    /// Whether the overlay contributes any pixels
    pub fn is_visible(&self) -> bool {
        self.enabled && self.opacity > 0.0
    }

    /// Show or hide the overlay
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        debug!(enabled, "Template toggled");
    }

    /// Set the opacity, clamped to `[0, 1]`; non-finite values are ignored
    pub fn set_opacity(&mut self, opacity: f32) {
        if opacity.is_finite() {
            self.opacity = opacity.clamp(0.0, 1.0);
            debug!(opacity = self.opacity, "Template opacity changed");
        }
    }

    /// Replace the reference image
    pub fn set_image(&mut self, image: TemplateImage) {
        debug!(image = ?image, "Template image changed");
        self.image = image;
    }

    /// Paint the overlay beneath or above the layers
    pub fn set_placement(&mut self, placement: TemplatePlacement) {
        self.placement = placement;
    }
}

impl Default for TemplateOverlay {
    fn default() -> Self {
        Self::from_config(&TemplateConfig::default())
    }
}
