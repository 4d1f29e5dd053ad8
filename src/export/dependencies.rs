use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::task;

use crate::export::{
    clipboard,
    file::{self, FileSaveConfig},
    types::{CapturedBitmap, ExportError},
};
use crate::scene::{Fragment, paint};

/// Abstraction over how a detached fragment is turned into pixels.
#[async_trait]
pub trait RasterBackend: Send + Sync {
    async fn rasterize(&self, fragment: Fragment, scale: u32) -> Result<CapturedBitmap, ExportError>;
}

/// Abstraction over saving exported documents.
pub trait ExportFileSaver: Send + Sync {
    fn save(&self, payload: &[u8], config: &FileSaveConfig) -> Result<PathBuf, ExportError>;
}

/// Abstraction over copying PNG payloads to the clipboard.
pub trait ExportClipboard: Send + Sync {
    fn copy(&self, png_data: &[u8]) -> Result<(), ExportError>;
}

/// Bundle of dependencies used by the export pipeline. Each component can be mocked in tests.
#[derive(Clone)]
pub struct ExportDependencies {
    pub backend: Arc<dyn RasterBackend>,
    pub saver: Arc<dyn ExportFileSaver>,
    pub clipboard: Arc<dyn ExportClipboard>,
}

impl Default for ExportDependencies {
    fn default() -> Self {
        Self {
            backend: Arc::new(CairoBackend),
            saver: Arc::new(DefaultFileSaver),
            clipboard: Arc::new(DefaultClipboard),
        }
    }
}

/// Lays out and paints fragments with Cairo/Pango on the blocking pool.
pub struct CairoBackend;
struct DefaultFileSaver;
struct DefaultClipboard;

#[async_trait]
impl RasterBackend for CairoBackend {
    async fn rasterize(&self, fragment: Fragment, scale: u32) -> Result<CapturedBitmap, ExportError> {
        task::spawn_blocking(move || paint::rasterize(&fragment.tree, fragment.root, scale))
            .await
            .map_err(|e| ExportError::CaptureFailure(format!("Raster task failed: {}", e)))?
    }
}

impl ExportFileSaver for DefaultFileSaver {
    fn save(&self, payload: &[u8], config: &FileSaveConfig) -> Result<PathBuf, ExportError> {
        file::save_document(payload, config)
    }
}

impl ExportClipboard for DefaultClipboard {
    fn copy(&self, png_data: &[u8]) -> Result<(), ExportError> {
        clipboard::copy_to_clipboard(png_data)
    }
}
