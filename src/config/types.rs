//! Configuration type definitions.

use crate::export::LayoutMode;
use crate::export::types::DEFAULT_FONT_SIZE_PX;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Defaults applied to every export unless overridden on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExportSection {
    /// Target text size in CSS pixels (valid range: 8 - 48). The views are
    /// designed at 14px; everything is rescaled relative to that.
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Chip sequence width: "fixed" forces a 720px reference width,
    /// "tight" sizes to content
    #[serde(default)]
    pub layout: LayoutMode,

    /// Stack a text label above the exported content
    #[serde(default)]
    pub include_label: bool,

    /// Label text used when `include_label` is set
    #[serde(default)]
    pub label: String,

    /// Upper bound on a single rasterization in milliseconds (0 disables the bound)
    #[serde(default = "default_capture_timeout_ms")]
    pub capture_timeout_ms: u64,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            layout: LayoutMode::default(),
            include_label: false,
            label: String::new(),
            capture_timeout_ms: default_capture_timeout_ms(),
        }
    }
}

/// Where document exports are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OutputSection {
    /// Directory for `tokens.pdf`. Supports `~` expansion; defaults to the
    /// Downloads folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_directory: Option<String>,
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE_PX
}

fn default_capture_timeout_ms() -> u64 {
    10_000
}
