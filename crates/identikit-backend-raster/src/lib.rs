//! Identikit Raster Backend
//!
//! Renders artboard snapshots to RGBA frames and exports them as PNG or
//! JPEG. Assets are decoded from disk (or memory) and cached; broken assets
//! render as a placeholder card instead of failing the artboard.

pub mod assets;
pub mod compositor;
pub mod export;
pub mod renderer;

pub use assets::{AssetError, AssetLibrary, AssetSource, DirectorySource, MemorySource};
pub use export::{ExportError, ExportPipeline, ExportedImage};
pub use renderer::{ArtboardRenderer, RenderPurpose};
