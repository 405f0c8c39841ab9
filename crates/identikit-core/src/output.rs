//! Raster output types
//!
//! Pixel buffers produced by the artboard renderer, and the export formats
//! they can be encoded to.

use crate::config::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Image frame - straight-alpha RGBA8 pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFrame {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Raw pixel data, row-major, 4 bytes per pixel
    pub data: Vec<u8>,
}

impl ImageFrame {
    /// Create a new fully transparent frame
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Create a frame filled with one color
    pub fn filled(width: u32, height: u32, rgba: Rgba) -> Self {
        let mut frame = Self::new(width, height);
        frame.fill(rgba);
        frame
    }

    /// Wrap existing RGBA8 data
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Dimensions as `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Get pixel at position
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let idx = self.index(x, y);
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Set pixel at position; out-of-bounds writes are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = self.index(x, y);
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Fill entire image with a color
    pub fn fill(&mut self, rgba: Rgba) {
        for pixel in self.data.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
    }

    /// Iterate pixels in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = Rgba> + '_ {
        self.data
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Whether every pixel is fully opaque
    pub fn is_opaque(&self) -> bool {
        self.pixels().all(|p| p[3] == 255)
    }

    /// Consume the frame, returning the raw RGBA8 data
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

/// Bitmap export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossless, keeps per-pixel transparency
    Png,
    /// Lossy, flattened onto white
    Jpeg,
}

impl ExportFormat {
    /// File extension used for downloads
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// MIME type
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Download file name, e.g. `sketch.png` or `sketch.jpg`
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension())
    }

    /// Whether the format keeps an alpha channel
    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::Png)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => f.write_str("png"),
            Self::Jpeg => f.write_str("jpeg"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}
