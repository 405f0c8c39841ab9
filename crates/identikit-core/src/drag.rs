//! Pointer drag contract
//!
//! The host input layer reports a pointer-down on a layer followed by
//! incremental `(dx, dy)` moves. The tracker routes each move through
//! [`LayerStore::set_position`], so drag updates take the same mutation path
//! as every other position change. A drag never changes stack order.

use crate::layer::LayerId;
use crate::store::LayerStore;
use tracing::debug;

/// An in-progress drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    /// The dragged layer
    pub layer: LayerId,
    /// Layer position when the drag began
    pub origin: [f64; 2],
    /// Accumulated pointer movement
    pub delta: [f64; 2],
}

/// Why a pointer-down did not start a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragRejection {
    /// The layer is not in the store
    UnknownLayer,
    /// The layer is hidden
    Hidden,
    /// The layer is locked
    Locked,
}

/// Tracks at most one active drag
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    active: Option<DragGesture>,
}

impl DragTracker {
    /// Create an idle tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// The active drag, if any
    pub fn active(&self) -> Option<&DragGesture> {
        self.active.as_ref()
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Start dragging a layer
    ///
    /// Locked and hidden layers never enter a drag. Any previous drag is
    /// dropped.
    pub fn begin(&mut self, store: &LayerStore, id: LayerId) -> Result<(), DragRejection> {
        self.active = None;

        let layer = store.get(id).ok_or(DragRejection::UnknownLayer)?;
        if layer.is_hidden() {
            return Err(DragRejection::Hidden);
        }
        if layer.is_locked() {
            return Err(DragRejection::Locked);
        }

        debug!(layer = %id, "Drag started");
        self.active = Some(DragGesture {
            layer: id,
            origin: layer.position,
            delta: [0.0, 0.0],
        });
        Ok(())
    }

    /// Apply one pointer movement
    ///
    /// Returns `false` when no drag is active or the move was not applied.
    /// If the dragged layer disappeared the drag ends; if it became locked
    /// mid-drag the move is ignored.
    pub fn update(&mut self, store: &mut LayerStore, dx: f64, dy: f64) -> bool {
        let Some(gesture) = self.active.as_mut() else {
            return false;
        };

        let Some(layer) = store.get(gesture.layer) else {
            debug!(layer = %gesture.layer, "Dragged layer vanished");
            self.active = None;
            return false;
        };
        if !layer.is_draggable() {
            return false;
        }

        gesture.delta[0] += dx;
        gesture.delta[1] += dy;
        let x = gesture.origin[0] + gesture.delta[0];
        let y = gesture.origin[1] + gesture.delta[1];
        store.set_position(gesture.layer, x, y)
    }

    /// Finish the drag, returning the layer that was dragged
    pub fn end(&mut self) -> Option<LayerId> {
        let gesture = self.active.take()?;
        debug!(
            layer = %gesture.layer,
            dx = gesture.delta[0],
            dy = gesture.delta[1],
            "Drag ended"
        );
        Some(gesture.layer)
    }

    /// Drop the drag if it targets `id`
    pub fn forget(&mut self, id: LayerId) {
        if self.active.is_some_and(|g| g.layer == id) {
            self.active = None;
        }
    }
}
