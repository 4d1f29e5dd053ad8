//! Data types for the export pipeline.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::encode::PageGeometry;

/// Supersampling factor applied to every capture.
pub const SUPERSAMPLE_SCALE: u32 = 4;

/// Type size the views are designed at; rescaling ratios are relative to it.
pub const BASELINE_FONT_SIZE_PX: u32 = 14;

pub const MIN_FONT_SIZE_PX: u32 = 8;
pub const MAX_FONT_SIZE_PX: u32 = 48;
pub const DEFAULT_FONT_SIZE_PX: u32 = 28;

/// Unscaled width the chips view is forced to in fixed layout.
pub const FIXED_LAYOUT_WIDTH_PX: u32 = 720;

/// Name of the file offered for saving by the document action.
pub const DOCUMENT_FILE_NAME: &str = "tokens.pdf";

/// Width policy for exported chip sequences.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// Size to the natural content width.
    Tight,
    /// Force a shared 720px reference width.
    #[default]
    Fixed,
}

/// Options of one export invocation. Immutable once built.
///
/// # Examples
///
/// ```
/// use tokensnap::export::{ExportConfig, LayoutMode};
/// let config = ExportConfig::new(99).with_label("gpt2").with_layout(LayoutMode::Tight);
/// assert_eq!(config.font_size_px(), 48);
/// assert!(config.include_label());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    include_label: bool,
    label: String,
    layout_mode: LayoutMode,
    font_size_px: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_SIZE_PX)
    }
}

impl ExportConfig {
    /// Builds a config with the font size clamped to the supported range.
    pub fn new(font_size_px: u32) -> Self {
        Self {
            include_label: false,
            label: String::new(),
            layout_mode: LayoutMode::default(),
            font_size_px: font_size_px.clamp(MIN_FONT_SIZE_PX, MAX_FONT_SIZE_PX),
        }
    }

    /// Enables the label annotation with the given text.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.include_label = true;
        self.label = label.into();
        self
    }

    pub fn with_layout(mut self, layout_mode: LayoutMode) -> Self {
        self.layout_mode = layout_mode;
        self
    }

    pub fn include_label(&self) -> bool {
        self.include_label
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode
    }

    pub fn font_size_px(&self) -> u32 {
        self.font_size_px
    }
}

/// Which view drives the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSite {
    /// Token-sequence view.
    Chips,
    /// Token-variant card view.
    Cards,
}

/// What the caller wants done with the final bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportAction {
    /// PNG to the system clipboard.
    Clipboard,
    /// Single-page PDF offered for saving.
    Document,
}

/// Premultiplied ARGB32 raster in Cairo's native byte order.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedBitmap {
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for CapturedBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedBitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

impl CapturedBitmap {
    /// Fully transparent bitmap.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            stride: width * 4,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    /// Copies the pixels out of a finished image surface.
    pub fn from_surface(mut surface: cairo::ImageSurface) -> Result<Self, ExportError> {
        surface.flush();
        let width = surface.width() as u32;
        let height = surface.height() as u32;
        let stride = surface.stride() as u32;
        let pixels = surface
            .data()
            .map_err(|e| ExportError::CaptureFailure(format!("Surface still borrowed: {}", e)))?
            .to_vec();
        Ok(Self {
            width,
            height,
            stride,
            pixels,
        })
    }

    /// Wraps a copy of the pixels in a Cairo image surface.
    pub fn to_surface(&self) -> Result<cairo::ImageSurface, cairo::Error> {
        cairo::ImageSurface::create_for_data(
            self.pixels.clone(),
            cairo::Format::ARgb32,
            self.width as i32,
            self.height as i32,
            self.stride as i32,
        )
    }

    /// Raw bytes of the pixel at `(x, y)`.
    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = (y * self.stride + x * 4) as usize;
        let mut out = [0; 4];
        out.copy_from_slice(&self.pixels[offset..offset + 4]);
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Png,
    Pdf,
}

/// Where an artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactDestination {
    Clipboard,
    File(PathBuf),
}

/// Final output of a successful export.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub payload: Vec<u8>,
    pub destination: ArtifactDestination,
    /// Page geometry, for documents.
    pub page: Option<PageGeometry>,
}

/// Errors that end an export. None of them are retried.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Capture failed: {0}")]
    CaptureFailure(String),

    #[error("Clipboard operation failed: {0}")]
    ClipboardFailure(String),

    #[error("Encoding failed: {0}")]
    EncodingFailure(String),
}

/// Lifecycle of one export run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExportState {
    #[default]
    Idle,
    Capturing,
    Composing,
    Encoding,
    Done,
    Failed(String),
}

impl ExportState {
    /// Whether a run is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            ExportState::Capturing | ExportState::Composing | ExportState::Encoding
        )
    }
}
