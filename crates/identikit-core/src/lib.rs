//! Identikit Core - Layer model and editor state for sketch composition
//!
//! Identikit composes a face sketch from catalog assets (eyes, nose, lips,
//! hair, ...). Each placed asset is a layer with its own position, width,
//! rotation, visibility and lock state. The order of the layer stack is the
//! paint order: index 0 is painted first and sits at the back.
//!
//! # Architecture
//!
//! ```text
//! AssetCatalog ──add──▶ LayerStore ◀──set_position── DragTracker ◀── pointer deltas
//!                           │
//!                  SelectionController        TemplateOverlay
//!                           │                       │
//!                           └──── SketchSession ────┘
//!                                      │
//!                               ArtboardSnapshot ──▶ renderer / export
//! ```
//!
//! All mutation goes through [`SketchSession`] (or the components it owns).
//! Renderers and exporters read an owned [`ArtboardSnapshot`], never the
//! live store.

pub mod catalog;
pub mod config;
pub mod drag;
pub mod error;
pub mod layer;
pub mod output;
pub mod selection;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod template;
pub mod transform;

// Re-export commonly used types
pub use catalog::{AssetCatalog, Category};
pub use config::{
    ArtboardConfig, DuplicatePlacement, EditorConfig, ExportConfig, LayerDefaults, Rgba,
    TemplateConfig, TemplatePlacement,
};
pub use drag::{DragGesture, DragRejection, DragTracker};
pub use error::{CatalogError, ConfigError};
pub use layer::{AssetRef, Layer, LayerFlags, LayerId, LayerProperties, WidthRange};
pub use output::{ExportFormat, ImageFrame};
pub use selection::{Selection, SelectionController};
pub use session::{PointerDown, SketchSession};
pub use snapshot::ArtboardSnapshot;
pub use store::LayerStore;
pub use template::{TemplateImage, TemplateOverlay};
pub use transform::{Bounds, Placement};
