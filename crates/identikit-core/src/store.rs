//! Layer Store
//!
//! Owns the ordered layer stack. Stack order is paint order: index 0 paints
//! first (bottom), the last layer paints on top. Reordering only moves
//! layers within the sequence; it never changes their identity.
//!
//! Every operation that names a layer by id tolerates stale ids: an unknown
//! id turns the call into a no-op. Out-of-range widths and rotations are
//! clamped, never rejected.

use crate::config::{DuplicatePlacement, EditorConfig, LayerDefaults};
use crate::layer::{
    AssetRef, DUPLICATE_OFFSET, Layer, LayerFlags, LayerId, LayerProperties, WidthRange,
    clamp_rotation,
};
use tracing::debug;

/// The authoritative, ordered layer stack
#[derive(Debug, Clone)]
pub struct LayerStore {
    layers: Vec<Layer>,
    defaults: LayerDefaults,
    width_range: WidthRange,
    duplicate_placement: DuplicatePlacement,
}

impl LayerStore {
    /// Create an empty store with default settings
    pub fn new() -> Self {
        Self::from_config(&EditorConfig::default())
    }

    /// Create an empty store using the layer settings of `config`
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            layers: Vec::new(),
            defaults: config.layer_defaults,
            width_range: config.width_range,
            duplicate_placement: config.duplicate_placement,
        }
    }

    // -- Queries --

    /// Layers in stack order (bottom first)
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Iterate layers in stack order
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the stack is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Get a layer by id
    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Stack index of a layer
    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Whether a layer with this id exists
    pub fn contains(&self, id: LayerId) -> bool {
        self.index_of(id).is_some()
    }

    /// Range widths are clamped into
    pub fn width_range(&self) -> WidthRange {
        self.width_range
    }

    fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    // -- Mutations --

    /// Append a new topmost layer showing `asset` and return its id
    pub fn add(&mut self, asset: AssetRef) -> LayerId {
        let width = self.width_range.clamp(self.defaults.width);
        let layer = Layer::new(asset, self.defaults.position, width);
        let id = layer.id;

        debug!(layer = %id, asset = %layer.asset, index = self.layers.len(), "Layer added");
        self.layers.push(layer);
        id
    }

    /// Replace the position of a layer
    ///
    /// Returns `false` for unknown ids and non-finite coordinates.
    pub fn set_position(&mut self, id: LayerId, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }

        match self.get_mut(id) {
            Some(layer) => {
                layer.position = [x, y];
                debug!(layer = %id, x, y, "Layer moved");
                true
            }
            None => false,
        }
    }

    /// Merge the supplied properties into a layer, clamping each value
    ///
    /// Non-finite values are skipped. Returns `false` for unknown ids.
    pub fn set_properties(&mut self, id: LayerId, properties: LayerProperties) -> bool {
        let range = self.width_range;
        let Some(layer) = self.get_mut(id) else {
            return false;
        };

        if let Some(width) = properties.width.filter(|w| w.is_finite()) {
            layer.width = range.clamp(width);
        }
        if let Some(rotation) = properties.rotation.filter(|r| r.is_finite()) {
            layer.rotation = clamp_rotation(rotation);
        }

        debug!(
            layer = %id,
            width = layer.width,
            rotation = layer.rotation,
            "Layer properties updated"
        );
        true
    }

    /// Flip the hidden flag; returns the new state
    pub fn toggle_visibility(&mut self, id: LayerId) -> Option<bool> {
        self.toggle_flag(id, LayerFlags::HIDDEN)
    }

    /// Flip the locked flag; returns the new state
    pub fn toggle_lock(&mut self, id: LayerId) -> Option<bool> {
        self.toggle_flag(id, LayerFlags::LOCKED)
    }

    fn toggle_flag(&mut self, id: LayerId, flag: LayerFlags) -> Option<bool> {
        let layer = self.get_mut(id)?;
        layer.flags.toggle(flag);
        let set = layer.flags.contains(flag);

        debug!(layer = %id, flag = ?flag, set, "Layer flag toggled");
        Some(set)
    }

    /// Remove a layer, returning it
    pub fn remove(&mut self, id: LayerId) -> Option<Layer> {
        let index = self.index_of(id)?;
        let layer = self.layers.remove(index);

        debug!(layer = %id, index, "Layer removed");
        Some(layer)
    }

    /// Clone a layer under a new id, offset by `DUPLICATE_OFFSET`
    pub fn duplicate(&mut self, id: LayerId) -> Option<LayerId> {
        let index = self.index_of(id)?;
        let copy = self.layers[index].duplicate(DUPLICATE_OFFSET);
        let copy_id = copy.id;

        let target = match self.duplicate_placement {
            DuplicatePlacement::AboveSource => index + 1,
            DuplicatePlacement::Bottom => 0,
        };
        self.layers.insert(target, copy);

        debug!(source = %id, layer = %copy_id, index = target, "Layer duplicated");
        Some(copy_id)
    }

    /// Move the layer at `from` to `to`, shifting the layers between
    ///
    /// Out-of-range indices leave the stack untouched and return `false`.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.layers.len();
        if from >= len || to >= len {
            return false;
        }
        if from == to {
            return true;
        }

        let layer = self.layers.remove(from);
        debug!(layer = %layer.id, from, to, "Layer reordered");
        self.layers.insert(to, layer);
        true
    }

    /// Move a layer one step toward the front (`reorder(i, i + 1)`)
    ///
    /// "Up" means painted later, so a layer list that shows the topmost
    /// layer first should call this from its up control. A list ordered
    /// bottom first would decrement the index instead, which is
    /// [`LayerStore::move_down`]. The topmost layer and out-of-range
    /// indices stay put.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index >= self.layers.len().saturating_sub(1) {
            return false;
        }
        self.reorder(index, index + 1)
    }

    /// Move a layer one step toward the back (`reorder(i, i - 1)`)
    ///
    /// The bottom layer stays put.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.layers.len() {
            return false;
        }
        self.reorder(index, index - 1)
    }

    /// Drop every layer
    pub fn clear(&mut self) {
        debug!(count = self.layers.len(), "Layer store cleared");
        self.layers.clear();
    }
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ids(store: &LayerStore) -> Vec<LayerId> {
        store.iter().map(|l| l.id).collect()
    }

    #[test]
    fn test_add_appends_topmost_with_defaults() {
        let mut store = LayerStore::new();
        let a = store.add(AssetRef::new("eyes/01"));
        let b = store.add(AssetRef::new("nose/01"));

        assert_eq!(ids(&store), vec![a, b]);

        let layer = store.get(b).unwrap();
        assert_eq!(layer.position, [50.0, 50.0]);
        assert_eq!(layer.width, 100.0);
        assert_eq!(layer.rotation, 0.0);
        assert!(!layer.is_hidden());
        assert!(!layer.is_locked());
    }

    #[test]
    fn test_reorder_scenario() {
        let mut store = LayerStore::new();
        let a = store.add(AssetRef::new("eyes/01"));
        let b = store.add(AssetRef::new("nose/01"));

        assert!(store.reorder(1, 0));
        assert_eq!(ids(&store), vec![b, a]);
    }

    #[test]
    fn test_reorder_is_reversible() {
        let mut store = LayerStore::new();
        for i in 0..5 {
            store.add(AssetRef::new(format!("eyes/0{i}")));
        }
        let before = ids(&store);

        assert!(store.reorder(0, 3));
        assert_ne!(ids(&store), before);
        assert!(store.reorder(3, 0));
        assert_eq!(ids(&store), before);
    }

    #[test]
    fn test_reorder_out_of_range_is_noop() {
        let mut store = LayerStore::new();
        store.add(AssetRef::new("eyes/01"));
        store.add(AssetRef::new("eyes/02"));
        let before = ids(&store);

        assert!(!store.reorder(0, 2));
        assert!(!store.reorder(7, 0));
        assert_eq!(ids(&store), before);
    }

    #[test]
    fn test_move_up_down_clamp() {
        let mut store = LayerStore::new();
        let a = store.add(AssetRef::new("eyes/01"));
        let b = store.add(AssetRef::new("eyes/02"));

        assert!(!store.move_up(1));
        assert!(!store.move_down(0));
        assert_eq!(ids(&store), vec![a, b]);

        assert!(store.move_up(0));
        assert_eq!(ids(&store), vec![b, a]);
        assert!(store.move_down(1));
        assert_eq!(ids(&store), vec![a, b]);
    }

    #[test]
    fn test_move_out_of_range_index() {
        let mut empty = LayerStore::new();
        assert!(!empty.move_up(0));
        assert!(!empty.move_up(usize::MAX));

        let mut store = LayerStore::new();
        let a = store.add(AssetRef::new("eyes/01"));

        assert!(!store.move_up(usize::MAX));
        assert!(!store.move_down(usize::MAX));
        assert!(!store.move_up(1));
        assert_eq!(ids(&store), vec![a]);
    }

    #[test]
    fn test_set_position_only_touches_position() {
        let mut store = LayerStore::new();
        let a = store.add(AssetRef::new("eyes/01"));
        store.set_properties(a, LayerProperties::new().with_rotation(12.0));
        let before = store.get(a).unwrap().clone();

        assert!(store.set_position(a, 120.5, 80.25));
        assert!(store.set_position(a, 120.5, 80.25));

        let after = store.get(a).unwrap();
        assert_eq!(after.position, [120.5, 80.25]);
        assert_eq!(after.rotation, before.rotation);
        assert_eq!(after.width, before.width);
        assert_eq!(after.flags, before.flags);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut store = LayerStore::new();
        store.add(AssetRef::new("eyes/01"));
        let before = store.layers().to_vec();
        let stale = LayerId::new();

        assert!(!store.set_position(stale, 1.0, 1.0));
        assert!(!store.set_properties(stale, LayerProperties::new().with_width(300.0)));
        assert_eq!(store.toggle_visibility(stale), None);
        assert_eq!(store.toggle_lock(stale), None);
        assert!(store.remove(stale).is_none());
        assert!(store.duplicate(stale).is_none());

        assert_eq!(store.layers(), before.as_slice());
    }

    #[test]
    fn test_width_clamped_to_bounds() {
        let mut store = LayerStore::new();
        let a = store.add(AssetRef::new("eyes/01"));

        store.set_properties(a, LayerProperties::new().with_width(5.0));
        assert_eq!(store.get(a).unwrap().width, 20.0);

        store.set_properties(a, LayerProperties::new().with_width(5000.0));
        assert_eq!(store.get(a).unwrap().width, 1000.0);

        store.set_properties(a, LayerProperties::new().with_width(f64::NAN));
        assert_eq!(store.get(a).unwrap().width, 1000.0);
    }

    #[test]
    fn test_partial_properties_merge() {
        let mut store = LayerStore::new();
        let a = store.add(AssetRef::new("eyes/01"));

        store.set_properties(a, LayerProperties::new().with_width(240.0));
        store.set_properties(a, LayerProperties::new().with_rotation(-400.0));

        let layer = store.get(a).unwrap();
        assert_eq!(layer.width, 240.0);
        assert_eq!(layer.rotation, -180.0);
    }

    #[test]
    fn test_toggles() {
        let mut store = LayerStore::new();
        let a = store.add(AssetRef::new("eyes/01"));

        assert_eq!(store.toggle_visibility(a), Some(true));
        assert!(store.get(a).unwrap().is_hidden());
        assert_eq!(store.toggle_visibility(a), Some(false));

        assert_eq!(store.toggle_lock(a), Some(true));
        assert!(store.get(a).unwrap().is_locked());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_lands_above_source() {
        let mut store = LayerStore::new();
        let a = store.add(AssetRef::new("eyes/01"));
        let b = store.add(AssetRef::new("nose/01"));
        store.set_properties(a, LayerProperties::new().with_width(180.0).with_rotation(15.0));

        let copy = store.duplicate(a).unwrap();
        assert_eq!(ids(&store), vec![a, copy, b]);

        let source = store.get(a).unwrap();
        let clone = store.get(copy).unwrap();
        assert_ne!(clone.id, source.id);
        assert_eq!(clone.asset, source.asset);
        assert_eq!(clone.width, source.width);
        assert_eq!(clone.rotation, source.rotation);
        assert_eq!(clone.position, [60.0, 60.0]);
    }

    #[test]
    fn test_duplicate_bottom_placement() {
        let config = EditorConfig {
            duplicate_placement: DuplicatePlacement::Bottom,
            ..Default::default()
        };
        let mut store = LayerStore::from_config(&config);
        let a = store.add(AssetRef::new("eyes/01"));
        let b = store.add(AssetRef::new("nose/01"));

        let copy = store.duplicate(b).unwrap();
        assert_eq!(ids(&store), vec![copy, a, b]);
    }

    #[test]
    fn test_ids_unique_and_length_tracks_adds_minus_removes() {
        let mut store = LayerStore::new();
        let mut added = 0usize;
        let mut removed = 0usize;

        for round in 0..20 {
            let id = store.add(AssetRef::new(format!("hair/{round}")));
            added += 1;

            if round % 3 == 0 {
                store.reorder(0, store.len() - 1);
            }
            if round % 4 == 0 && store.remove(id).is_some() {
                removed += 1;
            }

            let unique: HashSet<_> = store.iter().map(|l| l.id).collect();
            assert_eq!(unique.len(), store.len());
            assert_eq!(store.len(), added - removed);
        }
    }
}
