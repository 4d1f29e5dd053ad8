//! Visual export of token views.
//!
//! An export clones a live element into an off-screen container, rewrites
//! the clone's styles for print, rasterizes it at 4x, optionally stacks a
//! label above it and finally encodes the bitmap:
//! - PNG to the clipboard
//! - single-page PDF saved as `tokens.pdf`
//!
//! Views drive runs through an [`ExportManager`], whose state machine also
//! acts as the busy guard.

pub mod clipboard;
pub mod compose;
pub mod encode;
pub mod file;
pub mod policy;
pub mod types;

mod capture;
mod dependencies;
mod manager;
mod pipeline;

pub use capture::SnapshotCapturer;
pub use dependencies::{CairoBackend, ExportClipboard, ExportDependencies, ExportFileSaver, RasterBackend};
pub use encode::{Orientation, PageGeometry};
pub use file::FileSaveConfig;
pub use manager::{DEFAULT_CAPTURE_TIMEOUT, ExportManager, ExportSettings, ExportTicket};
pub use policy::StylePolicy;
pub use types::{
    Artifact, ArtifactDestination, ArtifactKind, CallSite, CapturedBitmap, ExportAction,
    ExportConfig, ExportError, ExportState, LayoutMode, SUPERSAMPLE_SCALE,
};
