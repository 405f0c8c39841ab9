//! Selection Controller
//!
//! Tracks at most one layer in the editing state. The controller only
//! enters `Editing(id)` after checking the id against the Layer Store, so a
//! selection of a nonexistent layer cannot be produced through it.

use crate::layer::{Layer, LayerId};
use crate::store::LayerStore;
use serde::Serialize;
use tracing::debug;

/// Selection state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Selection {
    /// Nothing selected
    #[default]
    Idle,
    /// One layer has its property controls attached
    Editing(LayerId),
}

impl Selection {
    /// The selected id, if any
    pub fn id(&self) -> Option<LayerId> {
        match self {
            Self::Idle => None,
            Self::Editing(id) => Some(*id),
        }
    }
}

/// Owns the selection state machine
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: Selection,
}

impl SelectionController {
    /// Create a controller in the idle state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> Selection {
        self.state
    }

    /// Selected layer id, if any
    pub fn current(&self) -> Option<LayerId> {
        self.state.id()
    }

    /// Whether `id` is the selected layer
    pub fn is_selected(&self, id: LayerId) -> bool {
        self.current() == Some(id)
    }

    /// The selected layer, looked up in `store`
    pub fn selected_layer<'a>(&self, store: &'a LayerStore) -> Option<&'a Layer> {
        self.current().and_then(|id| store.get(id))
    }

    /// Select a layer; unknown ids fall back to idle
    pub fn select(&mut self, store: &LayerStore, id: LayerId) -> Selection {
        self.state = if store.contains(id) {
            Selection::Editing(id)
        } else {
            Selection::Idle
        };

        debug!(selection = ?self.state, "Selection changed");
        self.state
    }

    /// Drop the selection
    pub fn clear(&mut self) {
        if self.state != Selection::Idle {
            debug!("Selection cleared");
        }
        self.state = Selection::Idle;
    }

    /// Pointer-down on empty artboard space
    ///
    /// Clears the selection when `clears` is set, otherwise keeps it.
    pub fn click_empty_canvas(&mut self, clears: bool) {
        if clears {
            self.clear();
        }
    }

    /// Notify the controller that a layer left the store
    ///
    /// Returns `true` when this forced the transition back to idle.
    pub fn layer_removed(&mut self, id: LayerId) -> bool {
        if self.is_selected(id) {
            self.clear();
            true
        } else {
            false
        }
    }

    /// Drop a selection whose layer no longer exists in `store`
    pub fn reconcile(&mut self, store: &LayerStore) {
        if let Some(id) = self.current() {
            if !store.contains(id) {
                self.clear();
            }
        }
    }
}
