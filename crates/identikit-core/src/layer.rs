//! Placed layers
//!
//! A layer is one positioned, transformable instance of a catalog asset.
//! Layers never carry their own height: the rendered height always follows
//! the intrinsic aspect ratio of the asset they reference.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lowest storable rotation, in degrees
pub const MIN_ROTATION: f64 = -180.0;

/// Highest storable rotation, in degrees
pub const MAX_ROTATION: f64 = 180.0;

/// Offset applied to a duplicated layer, in artboard units
pub const DUPLICATE_OFFSET: [f64; 2] = [10.0, 10.0];

/// Unique layer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub Uuid);

impl LayerId {
    /// Create a new random layer ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Last six hex digits, as shown next to the property editor
    pub fn short(&self) -> String {
        let simple = self.0.simple().to_string();
        simple[simple.len() - 6..].to_string()
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference into the asset catalog, written as `<category>/<name>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    /// Create an asset reference from its full path form
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Create an asset reference from a category and an asset name
    pub fn from_parts(category: &str, name: &str) -> Self {
        Self(format!("{category}/{name}"))
    }

    /// Full reference string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Category part (everything before the first `/`)
    ///
    /// References without a separator have no category and return `""`.
    pub fn category(&self) -> &str {
        match self.0.split_once('/') {
            Some((category, _)) => category,
            None => "",
        }
    }

    /// Asset name within its category
    pub fn name(&self) -> &str {
        match self.0.split_once('/') {
            Some((_, name)) => name,
            None => &self.0,
        }
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

bitflags! {
    /// Editing flags for a layer
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct LayerFlags: u8 {
        /// Excluded from rendering, hit testing and drag
        const HIDDEN = 0b0000_0001;
        /// Cannot be repositioned by drag
        const LOCKED = 0b0000_0010;
    }
}

/// Inclusive range a layer width is clamped into
///
/// Deserialized bounds go through [`WidthRange::new`], so a reversed range
/// in a config file is swapped rather than kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "WidthBounds")]
pub struct WidthRange {
    /// Smallest allowed width
    pub min: f64,
    /// Largest allowed width
    pub max: f64,
}

impl WidthRange {
    /// Create a width range, swapping the bounds if given in reverse
    ///
    /// A non-finite bound falls back to its default.
    pub fn new(min: f64, max: f64) -> Self {
        let defaults = Self::default();
        let min = if min.is_finite() { min } else { defaults.min };
        let max = if max.is_finite() { max } else { defaults.max };

        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Clamp a width into this range
    pub fn clamp(&self, width: f64) -> f64 {
        width.max(self.min).min(self.max)
    }

    /// Whether a width lies inside this range
    pub fn contains(&self, width: f64) -> bool {
        width >= self.min && width <= self.max
    }
}

impl Default for WidthRange {
    fn default() -> Self {
        Self {
            min: 20.0,
            max: 1000.0,
        }
    }
}

/// Width bounds as written in a config file
#[derive(Deserialize)]
#[serde(default)]
struct WidthBounds {
    min: f64,
    max: f64,
}

impl Default for WidthBounds {
    fn default() -> Self {
        let WidthRange { min, max } = WidthRange::default();
        Self { min, max }
    }
}

impl From<WidthBounds> for WidthRange {
    fn from(bounds: WidthBounds) -> Self {
        Self::new(bounds.min, bounds.max)
    }
}

/// Clamp a rotation into `[MIN_ROTATION, MAX_ROTATION]`
pub fn clamp_rotation(degrees: f64) -> f64 {
    degrees.clamp(MIN_ROTATION, MAX_ROTATION)
}

/// Partial property update for a layer
///
/// Only the supplied fields are merged into the layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerProperties {
    /// New width (clamped to the store's width range)
    #[serde(default)]
    pub width: Option<f64>,
    /// New rotation in degrees (clamped to [-180, 180])
    #[serde(default)]
    pub rotation: Option<f64>,
}

impl LayerProperties {
    /// Empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the width field
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the rotation field
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Whether no field is supplied
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.rotation.is_none()
    }
}

/// One placed instance of a catalog asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Stable identifier, never reused
    pub id: LayerId,
    /// The asset this layer shows (immutable after creation)
    pub asset: AssetRef,
    /// Top-left position in artboard space
    pub position: [f64; 2],
    /// Rendered width; height follows the asset's aspect ratio
    pub width: f64,
    /// Rotation in degrees about the layer's own center
    pub rotation: f64,
    /// Visibility and lock state
    pub flags: LayerFlags,
}

impl Layer {
    /// Create a layer with zero rotation and no flags set
    pub fn new(asset: AssetRef, position: [f64; 2], width: f64) -> Self {
        Self {
            id: LayerId::new(),
            asset,
            position,
            width,
            rotation: 0.0,
            flags: LayerFlags::empty(),
        }
    }

    /// Whether the layer is hidden
    pub fn is_hidden(&self) -> bool {
        self.flags.contains(LayerFlags::HIDDEN)
    }

    /// Whether the layer is locked against drag
    pub fn is_locked(&self) -> bool {
        self.flags.contains(LayerFlags::LOCKED)
    }

    /// Whether the layer can start a drag
    pub fn is_draggable(&self) -> bool {
        !self.is_hidden() && !self.is_locked()
    }

    /// Clone under a fresh id, offset by `delta`
    pub fn duplicate(&self, delta: [f64; 2]) -> Self {
        Self {
            id: LayerId::new(),
            asset: self.asset.clone(),
            position: [self.position[0] + delta[0], self.position[1] + delta[1]],
            width: self.width,
            rotation: self.rotation,
            flags: self.flags,
        }
    }

    /// Label for a layer list row, e.g. `eyes 2` for the second layer
    pub fn label(&self, index: usize) -> String {
        let category = self.asset.category();
        if category.is_empty() {
            format!("Layer {}", index + 1)
        } else {
            format!("{} {}", category, index + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_ref_parts() {
        let asset = AssetRef::new("nose/Group 53");
        assert_eq!(asset.category(), "nose");
        assert_eq!(asset.name(), "Group 53");

        let bare = AssetRef::new("portrait");
        assert_eq!(bare.category(), "");
        assert_eq!(bare.name(), "portrait");
    }

    #[test]
    fn test_layer_flags() {
        let mut layer = Layer::new(AssetRef::new("eyes/01"), [50.0, 50.0], 100.0);
        assert!(layer.is_draggable());

        layer.flags.toggle(LayerFlags::LOCKED);
        assert!(layer.is_locked());
        assert!(!layer.is_hidden());
        assert!(!layer.is_draggable());
    }

    #[test]
    fn test_duplicate_keeps_properties() {
        let mut layer = Layer::new(AssetRef::new("lips/03"), [40.0, 60.0], 150.0);
        layer.rotation = 30.0;

        let copy = layer.duplicate(DUPLICATE_OFFSET);
        assert_ne!(copy.id, layer.id);
        assert_eq!(copy.asset, layer.asset);
        assert_eq!(copy.width, 150.0);
        assert_eq!(copy.rotation, 30.0);
        assert_eq!(copy.position, [50.0, 70.0]);
    }

    #[test]
    fn test_width_range() {
        let range = WidthRange::default();
        assert_eq!(range.clamp(5.0), 20.0);
        assert_eq!(range.clamp(5000.0), 1000.0);
        assert_eq!(range.clamp(240.0), 240.0);

        let swapped = WidthRange::new(600.0, 20.0);
        assert_eq!(swapped.min, 20.0);
        assert_eq!(swapped.max, 600.0);

        let partial = WidthRange::new(f64::NAN, 300.0);
        assert_eq!(partial.min, 20.0);
        assert_eq!(partial.max, 300.0);
    }

    #[test]
    fn test_width_range_deserialize_swaps_reversed_bounds() {
        let range: WidthRange = serde_json::from_str(r#"{"min": 500, "max": 20}"#).unwrap();
        assert_eq!(range, WidthRange::new(20.0, 500.0));
        assert_eq!(range.clamp(5.0), 20.0);

        let only_max: WidthRange = serde_json::from_str(r#"{"max": 400}"#).unwrap();
        assert_eq!(only_max, WidthRange::new(20.0, 400.0));
    }

    #[test]
    fn test_rotation_clamp() {
        assert_eq!(clamp_rotation(270.0), 180.0);
        assert_eq!(clamp_rotation(-181.0), -180.0);
        assert_eq!(clamp_rotation(45.0), 45.0);
    }

    #[test]
    fn test_label() {
        let layer = Layer::new(AssetRef::new("hair/Group 17"), [0.0, 0.0], 100.0);
        assert_eq!(layer.label(0), "hair 1");
        assert_eq!(LayerId::new().short().len(), 6);
    }
}
