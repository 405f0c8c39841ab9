//! Editing session
//!
//! `SketchSession` owns the Layer Store, the Selection Controller, the drag
//! tracker and the template overlay for one visit to the editor. Input
//! handlers and panels receive it by reference and mutate state only
//! through the methods below, which keep the components consistent (for
//! example, removing the selected layer also clears the selection).

use crate::config::{EditorConfig, TemplatePlacement};
use crate::drag::{DragRejection, DragTracker};
use crate::layer::{AssetRef, Layer, LayerId, LayerProperties};
use crate::selection::{Selection, SelectionController};
use crate::snapshot::ArtboardSnapshot;
use crate::store::LayerStore;
use crate::template::{TemplateImage, TemplateOverlay};
use tracing::debug;

/// Result of a pointer-down on the artboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerDown {
    /// The layer was selected and is now being dragged
    Dragging(LayerId),
    /// The layer was selected but cannot move
    Selected(LayerId, DragRejection),
    /// The pointer hit empty canvas
    EmptyCanvas,
}

/// All editor state for one session
#[derive(Debug, Clone)]
pub struct SketchSession {
    config: EditorConfig,
    store: LayerStore,
    selection: SelectionController,
    drag: DragTracker,
    template: TemplateOverlay,
}

impl SketchSession {
    /// Start a session with an empty stack
    pub fn new(config: EditorConfig) -> Self {
        Self {
            store: LayerStore::from_config(&config),
            selection: SelectionController::new(),
            drag: DragTracker::new(),
            template: TemplateOverlay::from_config(&config.template),
            config,
        }
    }

    /// Session configuration
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Read-only view of the layer stack
    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    /// Layers in stack order
    pub fn layers(&self) -> &[Layer] {
        self.store.layers()
    }

    /// Current selection
    pub fn selection(&self) -> Selection {
        self.selection.state()
    }

    /// The selected layer, for the property editor
    pub fn selected_layer(&self) -> Option<&Layer> {
        self.selection.selected_layer(&self.store)
    }

    /// Template overlay state
    pub fn template(&self) -> &TemplateOverlay {
        &self.template
    }

    /// Drag tracker state
    pub fn drag(&self) -> &DragTracker {
        &self.drag
    }

    // -- Layer Store --

    /// Add a catalog asset as the new topmost layer
    pub fn add_from_catalog(&mut self, asset: AssetRef) -> LayerId {
        self.store.add(asset)
    }

    /// Set a layer position from the property editor
    pub fn set_position(&mut self, id: LayerId, x: f64, y: f64) -> bool {
        self.store.set_position(id, x, y)
    }

    /// Merge width/rotation edits into a layer
    pub fn set_properties(&mut self, id: LayerId, properties: LayerProperties) -> bool {
        self.store.set_properties(id, properties)
    }

    /// Show or hide a layer
    pub fn toggle_visibility(&mut self, id: LayerId) -> Option<bool> {
        let hidden = self.store.toggle_visibility(id)?;
        if hidden {
            self.drag.forget(id);
        }
        Some(hidden)
    }

    /// Lock or unlock a layer
    pub fn toggle_lock(&mut self, id: LayerId) -> Option<bool> {
        self.store.toggle_lock(id)
    }

    /// Delete a layer, clearing the selection and any drag that targets it
    pub fn remove(&mut self, id: LayerId) -> Option<Layer> {
        let layer = self.store.remove(id)?;
        self.selection.layer_removed(id);
        self.drag.forget(id);
        Some(layer)
    }

    /// Duplicate a layer
    pub fn duplicate(&mut self, id: LayerId) -> Option<LayerId> {
        self.store.duplicate(id)
    }

    /// Move a layer between stack positions
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        self.store.reorder(from, to)
    }

    /// Move a layer one step toward the front
    pub fn move_up(&mut self, index: usize) -> bool {
        self.store.move_up(index)
    }

    /// Move a layer one step toward the back
    pub fn move_down(&mut self, index: usize) -> bool {
        self.store.move_down(index)
    }

    // -- Selection --

    /// Select a layer (from the layer list or the canvas)
    pub fn select(&mut self, id: LayerId) -> Selection {
        self.selection.select(&self.store, id)
    }

    /// Click on empty artboard space
    pub fn click_empty_canvas(&mut self) {
        self.selection
            .click_empty_canvas(self.config.clear_selection_on_empty_click);
    }

    // -- Pointer input --

    /// Pointer-down on the artboard
    ///
    /// `target` is the topmost visible layer under the pointer, as reported
    /// by the renderer's hit test. A hit selects the layer and starts a drag
    /// unless the layer is locked; a miss counts as an empty-canvas click.
    pub fn pointer_down(&mut self, target: Option<LayerId>) -> PointerDown {
        let Some(id) = target else {
            self.drag.end();
            self.click_empty_canvas();
            return PointerDown::EmptyCanvas;
        };

        if let Selection::Idle = self.select(id) {
            self.click_empty_canvas();
            return PointerDown::EmptyCanvas;
        }

        match self.drag.begin(&self.store, id) {
            Ok(()) => PointerDown::Dragging(id),
            Err(rejection) => {
                debug!(layer = %id, ?rejection, "Pointer-down without drag");
                PointerDown::Selected(id, rejection)
            }
        }
    }

    /// Pointer movement during a drag
    pub fn pointer_move(&mut self, dx: f64, dy: f64) -> bool {
        self.drag.update(&mut self.store, dx, dy)
    }

    /// Pointer release
    pub fn pointer_up(&mut self) -> Option<LayerId> {
        self.drag.end()
    }

    // -- Template overlay --

    /// Show or hide the template
    pub fn set_template_enabled(&mut self, enabled: bool) {
        self.template.set_enabled(enabled);
    }

    /// Change template opacity (clamped to `[0, 1]`)
    pub fn set_template_opacity(&mut self, opacity: f32) {
        self.template.set_opacity(opacity);
    }

    /// Replace the template image
    pub fn set_template_image(&mut self, image: TemplateImage) {
        self.template.set_image(image);
    }

    /// Paint the template beneath or above the layers
    pub fn set_template_placement(&mut self, placement: TemplatePlacement) {
        self.template.set_placement(placement);
    }

    // -- Session lifecycle --

    /// Owned copy of the state the renderer reads
    pub fn snapshot(&self) -> ArtboardSnapshot {
        ArtboardSnapshot {
            artboard: self.config.artboard,
            layers: self.store.layers().to_vec(),
            selection: self.selection.current(),
            template: self.template.clone(),
        }
    }

    /// Discard the composition, as when the user leaves the editor
    pub fn reset(&mut self) {
        debug!(layers = self.store.len(), "Session reset");
        self.store.clear();
        self.selection.clear();
        self.drag = DragTracker::new();
        self.template = TemplateOverlay::from_config(&self.config.template);
    }
}

impl Default for SketchSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deleting_selected_layer_clears_selection() {
        let mut session = SketchSession::default();
        let a = session.add_from_catalog(AssetRef::new("eyes/01"));
        let b = session.add_from_catalog(AssetRef::new("nose/01"));

        session.select(a);
        session.remove(b);
        assert_eq!(session.selection(), Selection::Editing(a));

        session.remove(a);
        assert_eq!(session.selection(), Selection::Idle);
        assert!(session.selected_layer().is_none());
    }

    #[test]
    fn test_reorder_changes_paint_order() {
        let mut session = SketchSession::default();
        let a = session.add_from_catalog(AssetRef::new("eyes/01"));
        let b = session.add_from_catalog(AssetRef::new("nose/01"));
        let order = |s: &SketchSession| s.layers().iter().map(|l| l.id).collect::<Vec<_>>();
        assert_eq!(order(&session), [a, b]);

        assert!(session.reorder(1, 0));
        assert_eq!(order(&session), [b, a]);
        assert_eq!(session.snapshot().visible_layers().last().map(|l| l.id), Some(a));
    }

    #[test]
    fn test_lock_then_drag_scenario() {
        let mut session = SketchSession::default();
        let a = session.add_from_catalog(AssetRef::new("eyes/01"));
        session.toggle_lock(a);

        assert_eq!(
            session.pointer_down(Some(a)),
            PointerDown::Selected(a, DragRejection::Locked)
        );
        assert!(!session.pointer_move(50.0, 50.0));
        session.pointer_up();
        assert_eq!(session.layers()[0].position, [50.0, 50.0]);
        assert_eq!(session.selection(), Selection::Editing(a));

        session.toggle_lock(a);
        assert_eq!(session.pointer_down(Some(a)), PointerDown::Dragging(a));
        assert!(session.pointer_move(10.0, 10.0));
        assert_eq!(session.pointer_up(), Some(a));
        assert_eq!(session.layers()[0].position, [60.0, 60.0]);
    }

    #[test]
    fn test_empty_canvas_click_clears_by_default() {
        let mut session = SketchSession::default();
        let a = session.add_from_catalog(AssetRef::new("eyes/01"));
        session.select(a);

        assert_eq!(session.pointer_down(None), PointerDown::EmptyCanvas);
        assert_eq!(session.selection(), Selection::Idle);
    }

    #[test]
    fn test_empty_canvas_click_can_keep_selection() {
        let config = EditorConfig {
            clear_selection_on_empty_click: false,
            ..Default::default()
        };
        let mut session = SketchSession::new(config);
        let a = session.add_from_catalog(AssetRef::new("eyes/01"));
        session.select(a);

        session.click_empty_canvas();
        assert_eq!(session.selection(), Selection::Editing(a));
    }

    #[test]
    fn test_remove_during_drag_is_tolerated() {
        let mut session = SketchSession::default();
        let a = session.add_from_catalog(AssetRef::new("eyes/01"));

        session.pointer_down(Some(a));
        session.remove(a);
        assert!(!session.pointer_move(5.0, 5.0));
        assert_eq!(session.pointer_up(), None);
        assert!(session.layers().is_empty());
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_mutation() {
        let mut session = SketchSession::default();
        let a = session.add_from_catalog(AssetRef::new("eyes/01"));
        session.select(a);

        let snapshot = session.snapshot();
        session.set_position(a, 300.0, 300.0);
        session.add_from_catalog(AssetRef::new("nose/01"));

        assert_eq!(snapshot.layers.len(), 1);
        assert_eq!(snapshot.layers[0].position, [50.0, 50.0]);
        assert_eq!(snapshot.selection, Some(a));
        assert_eq!(snapshot.selected_layer().map(|l| l.id), Some(a));
    }

    #[test]
    fn test_reset() {
        let mut session = SketchSession::default();
        let a = session.add_from_catalog(AssetRef::new("eyes/01"));
        session.select(a);
        session.set_template_opacity(0.9);

        session.reset();
        assert!(session.layers().is_empty());
        assert_eq!(session.selection(), Selection::Idle);
        assert_eq!(session.template().opacity(), 0.25);
    }

    #[test]
    fn test_snapshot_json_dump() {
        let mut session = SketchSession::default();
        session.add_from_catalog(AssetRef::new("eyes/01"));

        let json = session.snapshot().to_json_pretty().unwrap();
        assert!(json.contains("\"eyes/01\""));
        assert!(json.contains("\"width\": 720"));
    }
}
