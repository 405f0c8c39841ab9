//! Artboard renderer
//!
//! Projects an [`ArtboardSnapshot`] onto a fixed-size RGBA surface. Paint
//! order, bottom to top:
//!
//! 1. Artboard background
//! 2. Template overlay, when placed beneath the layers
//! 3. Visible layers in stack order
//! 4. Template overlay, when placed above the layers
//! 5. Selection outline (display surface only)
//!
//! Rendering happens in two steps. [`ArtboardRenderer::resolve`] looks up
//! every asset the snapshot references; [`rasterize`] is a pure function of
//! the resolved artboard and can run on any thread.

use crate::assets::{AssetLibrary, default_template_frame};
use crate::compositor::{blend_frame, draw_placed, stroke_outline};
use identikit_core::{
    ArtboardConfig, ArtboardSnapshot, ImageFrame, Layer, LayerId, Placement, Rgba, TemplateImage,
    TemplatePlacement,
};
use std::sync::Arc;
use tracing::debug;

/// Selection outline color (`#3b82f6`)
pub const SELECTION_COLOR: Rgba = [0x3b, 0x82, 0xf6, 0xff];

/// Selection outline width in pixels
pub const SELECTION_WIDTH: f64 = 2.0;

/// What a render is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPurpose {
    /// Interactive surface: template shown when enabled, selection outlined
    Display,
    /// Export surface: no selection affordance, template per policy
    Export {
        /// Whether an enabled template is painted
        include_template: bool,
    },
}

/// A layer ready to paint
#[derive(Debug, Clone)]
pub struct ResolvedLayer {
    /// Layer id
    pub id: LayerId,
    /// Where the asset lands on the artboard
    pub placement: Placement,
    /// Decoded asset (or the placeholder)
    pub frame: Arc<ImageFrame>,
}

/// A template overlay ready to paint
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    /// Decoded template image
    pub frame: Arc<ImageFrame>,
    /// Overlay opacity
    pub opacity: f32,
    /// Beneath or above the layers
    pub placement: TemplatePlacement,
}

/// Snapshot with every asset resolved
#[derive(Debug, Clone)]
pub struct ResolvedArtboard {
    /// Artboard size and background
    pub artboard: ArtboardConfig,
    /// Visible layers in paint order
    pub layers: Vec<ResolvedLayer>,
    /// Selected layer, if visible
    pub selection: Option<LayerId>,
    /// Template overlay, if visible
    pub template: Option<ResolvedTemplate>,
}

/// Artboard renderer
pub struct ArtboardRenderer {
    assets: AssetLibrary,
    default_template: Option<Arc<ImageFrame>>,
}

impl ArtboardRenderer {
    /// Create a renderer backed by an asset library
    pub fn new(assets: AssetLibrary) -> Self {
        Self {
            assets,
            default_template: None,
        }
    }

    /// Asset library
    pub fn assets(&self) -> &AssetLibrary {
        &self.assets
    }

    /// Mutable asset library
    pub fn assets_mut(&mut self) -> &mut AssetLibrary {
        &mut self.assets
    }

    /// Where a layer lands on the artboard
    pub fn placement(&mut self, layer: &Layer) -> Placement {
        let frame = self.assets.resolve(&layer.asset);
        Placement::for_layer(layer, frame.dimensions())
    }

    /// Resolve every asset the snapshot paints
    pub fn resolve(&mut self, snapshot: &ArtboardSnapshot) -> ResolvedArtboard {
        let layers: Vec<ResolvedLayer> = snapshot
            .visible_layers()
            .map(|layer| {
                let frame = self.assets.resolve(&layer.asset);
                ResolvedLayer {
                    id: layer.id,
                    placement: Placement::for_layer(layer, frame.dimensions()),
                    frame,
                }
            })
            .collect();

        let selection = snapshot
            .selection
            .filter(|id| layers.iter().any(|l| l.id == *id));

        let template = if snapshot.template.is_visible() {
            let frame = match snapshot.template.image() {
                TemplateImage::Default => self.default_template(&snapshot.artboard),
                TemplateImage::Asset(asset) => self.assets.resolve(asset),
            };
            Some(ResolvedTemplate {
                frame,
                opacity: snapshot.template.opacity(),
                placement: snapshot.template.placement(),
            })
        } else {
            None
        };

        ResolvedArtboard {
            artboard: snapshot.artboard,
            layers,
            selection,
            template,
        }
    }

    /// Render a snapshot
    pub fn render(&mut self, snapshot: &ArtboardSnapshot, purpose: RenderPurpose) -> ImageFrame {
        let resolved = self.resolve(snapshot);
        rasterize(&resolved, purpose)
    }

    /// Topmost visible layer under an artboard point
    ///
    /// The template overlay never takes part in hit testing.
    pub fn hit_test(&mut self, snapshot: &ArtboardSnapshot, point: [f64; 2]) -> Option<LayerId> {
        let layers: Vec<&Layer> = snapshot.visible_layers().collect();
        layers
            .into_iter()
            .rev()
            .find(|layer| self.placement(layer).contains(point))
            .map(|layer| layer.id)
    }

    fn default_template(&mut self, artboard: &ArtboardConfig) -> Arc<ImageFrame> {
        match &self.default_template {
            Some(frame) if frame.dimensions() == (artboard.width, artboard.height) => {
                Arc::clone(frame)
            }
            _ => {
                let frame = Arc::new(default_template_frame(artboard.width, artboard.height));
                self.default_template = Some(Arc::clone(&frame));
                frame
            }
        }
    }
}

impl Default for ArtboardRenderer {
    fn default() -> Self {
        Self::new(AssetLibrary::empty())
    }
}

/// Paint a resolved artboard
pub fn rasterize(resolved: &ResolvedArtboard, purpose: RenderPurpose) -> ImageFrame {
    let ArtboardConfig {
        width,
        height,
        background,
    } = resolved.artboard;
    let mut frame = ImageFrame::filled(width, height, background);

    let template = match purpose {
        RenderPurpose::Display => resolved.template.as_ref(),
        RenderPurpose::Export { include_template } => {
            resolved.template.as_ref().filter(|_| include_template)
        }
    };

    if let Some(template) = template.filter(|t| t.placement == TemplatePlacement::Beneath) {
        paint_template(&mut frame, template);
    }

    for layer in &resolved.layers {
        draw_placed(&mut frame, &layer.frame, &layer.placement, 1.0);
    }

    if let Some(template) = template.filter(|t| t.placement == TemplatePlacement::Above) {
        paint_template(&mut frame, template);
    }

    if purpose == RenderPurpose::Display {
        let selected = resolved
            .selection
            .and_then(|id| resolved.layers.iter().find(|l| l.id == id));
        if let Some(layer) = selected {
            stroke_outline(&mut frame, &layer.placement, SELECTION_WIDTH, SELECTION_COLOR);
        }
    }

    debug!(
        width,
        height,
        layers = resolved.layers.len(),
        ?purpose,
        "Artboard rasterized"
    );
    frame
}

fn paint_template(frame: &mut ImageFrame, template: &ResolvedTemplate) {
    if template.frame.dimensions() == frame.dimensions() {
        blend_frame(frame, &template.frame, template.opacity);
    } else {
        let placement = Placement::contain(template.frame.dimensions(), frame.dimensions());
        draw_placed(frame, &template.frame, &placement, template.opacity);
    }
}
