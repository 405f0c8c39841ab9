//! Export pipeline
//!
//! Renders an artboard snapshot off-screen and encodes it as PNG or JPEG.
//! Assets are resolved on the caller's thread from the snapshot it passes
//! in; rasterization and encoding then run on the blocking pool, so the
//! caller may keep mutating its session while the export is in flight
//! without affecting the result.

use crate::compositor::flatten;
use crate::renderer::{ArtboardRenderer, RenderPurpose, ResolvedArtboard, rasterize};
use identikit_core::{ArtboardSnapshot, EditorConfig, ExportConfig, ExportFormat, ImageFrame};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// JPEG exports are flattened onto this color
const JPEG_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An encoded export, ready for preview or download
#[derive(Debug, Clone)]
pub struct ExportedImage {
    /// Encoding used
    pub format: ExportFormat,
    /// Download file name, e.g. `sketch.png`
    pub file_name: String,
    /// Composited frame, for inline preview
    pub frame: ImageFrame,
    /// Encoded file contents
    pub bytes: Vec<u8>,
}

impl ExportedImage {
    /// MIME type of the encoded bytes
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Write the download into `dir`, returning the written path
    ///
    /// The bytes go to a temporary sibling first and are renamed into place,
    /// so an interrupted save never leaves a partial file under the final name.
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let path = dir.as_ref().join(&self.file_name);
        let partial = dir.as_ref().join(format!(".{}.part", self.file_name));

        tokio::fs::write(&partial, &self.bytes).await?;
        if let Err(e) = tokio::fs::rename(&partial, &path).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }

        info!(path = %path.display(), bytes = self.bytes.len(), "Export saved");
        Ok(path)
    }
}

/// Export pipeline
#[derive(Debug, Clone, Default)]
pub struct ExportPipeline {
    settings: ExportConfig,
}

impl ExportPipeline {
    /// Create a pipeline with explicit settings
    pub fn new(settings: ExportConfig) -> Self {
        Self { settings }
    }

    /// Create a pipeline from the editor configuration
    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.export.clone())
    }

    /// Export settings
    pub fn settings(&self) -> &ExportConfig {
        &self.settings
    }

    fn purpose(&self) -> RenderPurpose {
        RenderPurpose::Export {
            include_template: self.settings.include_template,
        }
    }

    /// Export a snapshot
    ///
    /// The snapshot is taken by value: the bitmap always reflects the
    /// state at the moment it was captured.
    pub async fn export(
        &self,
        renderer: &mut ArtboardRenderer,
        snapshot: ArtboardSnapshot,
        format: ExportFormat,
    ) -> Result<ExportedImage, ExportError> {
        let resolved = renderer.resolve(&snapshot);
        let purpose = self.purpose();
        let quality = self.settings.jpeg_quality;
        let file_name = format.file_name(&self.settings.file_stem);

        debug!(%format, layers = resolved.layers.len(), "Export captured");

        // Spawn blocking task for CPU-bound work
        tokio::task::spawn_blocking(move || {
            render_and_encode(&resolved, purpose, format, quality, file_name)
        })
        .await
        .map_err(|e| ExportError::Capture(format!("Task join error: {}", e)))?
    }

    /// Export on the current thread
    pub fn export_blocking(
        &self,
        renderer: &mut ArtboardRenderer,
        snapshot: &ArtboardSnapshot,
        format: ExportFormat,
    ) -> Result<ExportedImage, ExportError> {
        let resolved = renderer.resolve(snapshot);
        render_and_encode(
            &resolved,
            self.purpose(),
            format,
            self.settings.jpeg_quality,
            format.file_name(&self.settings.file_stem),
        )
    }
}

fn render_and_encode(
    resolved: &ResolvedArtboard,
    purpose: RenderPurpose,
    format: ExportFormat,
    quality: u8,
    file_name: String,
) -> Result<ExportedImage, ExportError> {
    let frame = rasterize(resolved, purpose);
    let bytes = encode(&frame, format, quality)?;

    info!(
        %format,
        width = frame.width,
        height = frame.height,
        bytes = bytes.len(),
        file = %file_name,
        "Artboard exported"
    );

    Ok(ExportedImage {
        format,
        file_name,
        frame,
        bytes,
    })
}

/// Encode a frame
///
/// PNG keeps the alpha channel. JPEG is flattened onto white first;
/// `quality` (1-100) only applies to JPEG.
pub fn encode(frame: &ImageFrame, format: ExportFormat, quality: u8) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();

    match format {
        ExportFormat::Png => {
            PngEncoder::new(&mut buf).write_image(
                &frame.data,
                frame.width,
                frame.height,
                ExtendedColorType::Rgba8,
            )?;
        }
        ExportFormat::Jpeg => {
            let rgb = flatten(frame, JPEG_BACKGROUND);
            JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).encode(
                &rgb,
                frame.width,
                frame.height,
                ExtendedColorType::Rgb8,
            )?;
        }
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetLibrary, MemorySource};
    use identikit_core::{AssetRef, SketchSession};

    fn transparent_renderer() -> ArtboardRenderer {
        let source = MemorySource::new().with("eyes/01", ImageFrame::new(100, 50));
        ArtboardRenderer::new(AssetLibrary::new(source))
    }

    #[tokio::test]
    async fn test_empty_export_is_background() {
        let mut session = SketchSession::default();
        session.set_template_enabled(false);
        let mut renderer = ArtboardRenderer::default();
        let pipeline = ExportPipeline::default();

        let exported = pipeline
            .export(&mut renderer, session.snapshot(), ExportFormat::Png)
            .await
            .unwrap();

        let background = session.config().artboard.background;
        assert_eq!(exported.frame, ImageFrame::filled(720, 540, background));
        assert_eq!(exported.file_name, "sketch.png");

        let decoded = image::load_from_memory(&exported.bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (720, 540));
        assert!(decoded.pixels().all(|p| p.0 == background));
    }

    #[tokio::test]
    async fn test_jpeg_is_opaque() {
        let mut config = EditorConfig::default();
        config.artboard.background = [0, 0, 0, 0];
        config.export.include_template = true;

        let mut session = SketchSession::new(config.clone());
        session.set_template_opacity(0.5);
        session.add_from_catalog(AssetRef::new("eyes/01"));

        let mut renderer = transparent_renderer();
        let pipeline = ExportPipeline::from_config(&config);

        let exported = pipeline
            .export(&mut renderer, session.snapshot(), ExportFormat::Jpeg)
            .await
            .unwrap();

        assert_eq!(exported.file_name, "sketch.jpg");
        assert_eq!(exported.mime_type(), "image/jpeg");
        let decoded = image::load_from_memory(&exported.bytes).unwrap();
        assert!(!decoded.color().has_alpha());
        assert_eq!(decoded.width(), 720);
    }

    #[tokio::test]
    async fn test_png_keeps_transparency() {
        let mut config = EditorConfig::default();
        config.artboard.background = [0, 0, 0, 0];
        let session = SketchSession::new(config);

        let mut renderer = ArtboardRenderer::default();
        let exported = ExportPipeline::default()
            .export(&mut renderer, session.snapshot(), ExportFormat::Png)
            .await
            .unwrap();

        let decoded = image::load_from_memory(&exported.bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(10, 10).0, [0, 0, 0, 0]);
    }

    #[tokio::test]
    async fn test_export_uses_snapshot_not_live_state() {
        let mut session = SketchSession::default();
        session.set_template_enabled(false);
        let mut renderer = ArtboardRenderer::default();
        let pipeline = ExportPipeline::default();

        let snapshot = session.snapshot();
        session.add_from_catalog(AssetRef::new("eyes/01"));

        let exported = pipeline
            .export(&mut renderer, snapshot, ExportFormat::Png)
            .await
            .unwrap();
        assert!(exported.frame.pixels().all(|p| p == [255, 255, 255, 255]));
    }

    #[test]
    fn test_template_excluded_by_default() {
        let session = SketchSession::default();
        assert!(session.template().is_visible());

        let mut renderer = ArtboardRenderer::default();
        let exported = ExportPipeline::default()
            .export_blocking(&mut renderer, &session.snapshot(), ExportFormat::Png)
            .unwrap();
        assert!(exported.frame.pixels().all(|p| p == [255, 255, 255, 255]));
    }

    #[tokio::test]
    async fn test_save_to() {
        let dir = std::env::temp_dir().join(format!("identikit-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let frame = ImageFrame::filled(4, 4, [255, 255, 255, 255]);
        let exported = ExportedImage {
            format: ExportFormat::Png,
            file_name: "sketch.png".to_string(),
            bytes: encode(&frame, ExportFormat::Png, 92).unwrap(),
            frame,
        };

        let path = exported.save_to(&dir).await.unwrap();
        let written = std::fs::read(&path).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(path.file_name().unwrap(), "sketch.png");
        assert_eq!(written, exported.bytes);
    }
}
