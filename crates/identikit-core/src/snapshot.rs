//! Artboard snapshots
//!
//! A snapshot is an owned copy of everything the artboard renderer reads:
//! the layer stack, the selection and the template overlay. Rendering from
//! a snapshot is unaffected by any mutation made after it was taken.

use crate::config::ArtboardConfig;
use crate::layer::{Layer, LayerId};
use crate::template::TemplateOverlay;
use serde::Serialize;

/// Immutable copy of the editor state the renderer consumes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtboardSnapshot {
    /// Artboard size and background
    pub artboard: ArtboardConfig,
    /// Layers in stack order (bottom first)
    pub layers: Vec<Layer>,
    /// Selected layer, if any
    pub selection: Option<LayerId>,
    /// Template overlay state
    pub template: TemplateOverlay,
}

impl ArtboardSnapshot {
    /// Snapshot of an empty artboard
    pub fn empty(artboard: ArtboardConfig, template: TemplateOverlay) -> Self {
        Self {
            artboard,
            layers: Vec::new(),
            selection: None,
            template,
        }
    }

    /// Layers that paint, in paint order
    pub fn visible_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| !l.is_hidden())
    }

    /// The selected layer, if it is in the snapshot
    pub fn selected_layer(&self) -> Option<&Layer> {
        let id = self.selection?;
        self.layers.iter().find(|l| l.id == id)
    }

    /// Serialize for inspection
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
