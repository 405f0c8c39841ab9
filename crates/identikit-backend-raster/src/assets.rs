//! Asset loading
//!
//! Resolves catalog asset references to decoded RGBA frames. Sources are
//! pluggable; the library caches decoded frames and substitutes a
//! placeholder for anything that fails to load.

use identikit_core::{AssetRef, ImageFrame};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Placeholder size for assets that failed to load
pub const PLACEHOLDER_SIZE: (u32, u32) = (128, 64);

const PLACEHOLDER_FILL: [u8; 4] = [0xf8, 0xfa, 0xfc, 0xff];
const PLACEHOLDER_BORDER: [u8; 4] = [0xe5, 0xe7, 0xeb, 0xff];

/// File extensions tried, in order, when looking up an asset on disk
const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "PNG", "JPG", "JPEG"];

/// Asset errors
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode {asset}: {message}")]
    Decode { asset: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Somewhere decoded asset images come from
pub trait AssetSource: Send + Sync {
    /// Load and decode one asset
    fn load(&self, asset: &AssetRef) -> Result<ImageFrame, AssetError>;
}

/// Loads `<root>/<category>/<name>.<ext>` image files
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Serve assets from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Asset root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn find(&self, asset: &AssetRef) -> Option<PathBuf> {
        EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{}.{}", asset.as_str(), ext)))
            .find(|path| path.is_file())
    }
}

impl AssetSource for DirectorySource {
    fn load(&self, asset: &AssetRef) -> Result<ImageFrame, AssetError> {
        let path = self
            .find(asset)
            .ok_or_else(|| AssetError::NotFound(asset.to_string()))?;

        let img = image::open(&path)
            .map_err(|e| AssetError::Decode {
                asset: asset.to_string(),
                message: e.to_string(),
            })?
            .to_rgba8();

        let (width, height) = img.dimensions();
        ImageFrame::from_rgba(width, height, img.into_raw()).ok_or_else(|| AssetError::Decode {
            asset: asset.to_string(),
            message: "pixel buffer size mismatch".to_string(),
        })
    }
}

/// In-memory assets, for tests and generated content
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    frames: HashMap<AssetRef, ImageFrame>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset
    pub fn insert(&mut self, asset: impl Into<AssetRef>, frame: ImageFrame) {
        self.frames.insert(asset.into(), frame);
    }

    /// Builder-style [`MemorySource::insert`]
    pub fn with(mut self, asset: impl Into<AssetRef>, frame: ImageFrame) -> Self {
        self.insert(asset, frame);
        self
    }
}

impl AssetSource for MemorySource {
    fn load(&self, asset: &AssetRef) -> Result<ImageFrame, AssetError> {
        self.frames
            .get(asset)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(asset.to_string()))
    }
}

/// Caching asset resolver
pub struct AssetLibrary {
    source: Box<dyn AssetSource>,
    cache: HashMap<AssetRef, Arc<ImageFrame>>,
    failed: HashMap<AssetRef, String>,
    placeholder: Arc<ImageFrame>,
}

impl AssetLibrary {
    /// Create a library over `source`
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: HashMap::new(),
            failed: HashMap::new(),
            placeholder: Arc::new(placeholder_frame()),
        }
    }

    /// Library with no assets; every lookup yields the placeholder
    pub fn empty() -> Self {
        Self::new(MemorySource::new())
    }

    /// Resolve an asset, falling back to the placeholder on failure
    pub fn resolve(&mut self, asset: &AssetRef) -> Arc<ImageFrame> {
        self.try_resolve(asset)
            .unwrap_or_else(|_| Arc::clone(&self.placeholder))
    }

    /// Resolve an asset, reporting load failures
    ///
    /// Failures are remembered so a broken asset is only reported once.
    pub fn try_resolve(&mut self, asset: &AssetRef) -> Result<Arc<ImageFrame>, AssetError> {
        if let Some(frame) = self.cache.get(asset) {
            return Ok(Arc::clone(frame));
        }
        if let Some(message) = self.failed.get(asset) {
            return Err(AssetError::Decode {
                asset: asset.to_string(),
                message: message.clone(),
            });
        }

        match self.source.load(asset) {
            Ok(frame) => {
                debug!(asset = %asset, width = frame.width, height = frame.height, "Asset loaded");
                let frame = Arc::new(frame);
                self.cache.insert(asset.clone(), Arc::clone(&frame));
                Ok(frame)
            }
            Err(e) => {
                warn!(asset = %asset, error = %e, "Asset unavailable, using placeholder");
                self.failed.insert(asset.clone(), e.to_string());
                Err(e)
            }
        }
    }

    /// Whether `asset` resolves to the placeholder
    pub fn is_placeholder(&self, asset: &AssetRef) -> bool {
        self.failed.contains_key(asset)
    }

    /// Drop cached state for one asset so it is reloaded
    pub fn invalidate(&mut self, asset: &AssetRef) {
        self.cache.remove(asset);
        self.failed.remove(asset);
    }

    /// Number of decoded assets held
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl Default for AssetLibrary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Light card with a 1px border, shown for assets that fail to load
pub fn placeholder_frame() -> ImageFrame {
    let (width, height) = PLACEHOLDER_SIZE;
    let mut frame = ImageFrame::filled(width, height, PLACEHOLDER_FILL);

    for x in 0..width {
        frame.set_pixel(x, 0, PLACEHOLDER_BORDER);
        frame.set_pixel(x, height - 1, PLACEHOLDER_BORDER);
    }
    for y in 0..height {
        frame.set_pixel(0, y, PLACEHOLDER_BORDER);
        frame.set_pixel(width - 1, y, PLACEHOLDER_BORDER);
    }

    frame
}

/// Built-in face guide: a faint circle outline on white
///
/// Geometry is laid out on a 720x540 reference and scaled to fit.
pub fn default_template_frame(width: u32, height: u32) -> ImageFrame {
    let mut frame = ImageFrame::filled(width, height, [255, 255, 255, 255]);
    if width == 0 || height == 0 {
        return frame;
    }

    let scale = (width as f64 / 720.0).min(height as f64 / 540.0);
    let offset_x = (width as f64 - 720.0 * scale) / 2.0;
    let offset_y = (height as f64 - 540.0 * scale) / 2.0;
    let cx = offset_x + 360.0 * scale;
    let cy = offset_y + 220.0 * scale;
    let radius = 120.0 * scale;
    let stroke = scale.max(1.0);

    // Ring coverage, antialiased over one pixel
    for y in 0..height {
        for x in 0..width {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            let distance = ((dx * dx + dy * dy).sqrt() - radius).abs();
            let coverage = (stroke / 2.0 + 0.5 - distance).clamp(0.0, 1.0);
            if coverage > 0.0 {
                let shade = (255.0 * (1.0 - 0.3 * coverage)).round() as u8;
                frame.set_pixel(x, y, [shade, shade, shade, 255]);
            }
        }
    }

    frame
}
