//! Style rewriting applied to a cloned subtree before it is rasterized.

use super::types::{
    BASELINE_FONT_SIZE_PX, CallSite, ExportConfig, FIXED_LAYOUT_WIDTH_PX, LayoutMode,
    SUPERSAMPLE_SCALE,
};
use crate::scene::{Display, NodeId, RenderTree, Role};

/// Columns of the reflowed variant grid on exported cards.
pub const VARIANT_GRID_COLUMNS: u32 = 8;

/// Set of rewrites a call site wants applied to its clone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StylePolicy {
    /// Drop interactive controls.
    pub strip_controls: bool,
    /// Rescale type, padding and gaps relative to the 14px baseline.
    pub rescale_typography: bool,
    /// Reflow variant lists into a grid with this many columns.
    pub reflow_grid: Option<u32>,
    /// Width forced on the clone in fixed layout; tight layout clears it.
    pub force_width: Option<f64>,
}

impl StylePolicy {
    pub fn for_call_site(site: CallSite) -> Self {
        match site {
            CallSite::Chips => Self {
                strip_controls: true,
                rescale_typography: true,
                reflow_grid: None,
                force_width: Some(f64::from(FIXED_LAYOUT_WIDTH_PX)),
            },
            CallSite::Cards => Self {
                strip_controls: true,
                rescale_typography: true,
                reflow_grid: Some(VARIANT_GRID_COLUMNS),
                force_width: None,
            },
        }
    }

    /// Minimum content width (in supersampled pixels) the label compositor
    /// must reserve for this policy.
    pub fn min_label_width(&self, config: &ExportConfig) -> u32 {
        match (self.force_width, config.layout_mode()) {
            (Some(width), LayoutMode::Fixed) => width as u32 * SUPERSAMPLE_SCALE,
            _ => 0,
        }
    }

    /// Rewrites the subtree at `root` in place.
    pub fn apply(&self, tree: &mut RenderTree, root: NodeId, config: &ExportConfig) {
        if self.strip_controls {
            let removed = tree.remove_where(root, Role::Control);
            log::debug!("Stripped {} control(s) from export clone", removed);
        }

        if self.rescale_typography {
            rescale_typography(tree, root, config.font_size_px());
        }

        if let Some(columns) = self.reflow_grid {
            for id in tree.subtree(root) {
                if let Some(node) = tree.get_mut(id).filter(|node| node.role == Role::VariantList) {
                    node.style.display = Display::Grid { columns };
                }
            }
        }

        if let Some(width) = self.force_width
            && let Some(node) = tree.get_mut(root)
        {
            node.style.width = match config.layout_mode() {
                LayoutMode::Fixed => Some(width),
                LayoutMode::Tight => None,
            };
        }
    }
}

/// Rounds `value * ratio` to whole pixels.
pub fn rescale_px(value: f64, ratio: f64) -> f64 {
    (value * ratio).round()
}

/// Like [`rescale_px`] but non-zero padding never collapses below 1px.
pub fn rescale_padding(value: f64, ratio: f64) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }
    rescale_px(value, ratio).max(1.0)
}

fn rescale_typography(tree: &mut RenderTree, root: NodeId, font_size_px: u32) {
    if font_size_px == BASELINE_FONT_SIZE_PX {
        return;
    }
    let ratio = f64::from(font_size_px) / f64::from(BASELINE_FONT_SIZE_PX);

    // Sizes must be read before the root changes, since descendants inherit from it.
    let originals: Vec<(NodeId, f64)> = tree
        .subtree(root)
        .into_iter()
        .map(|id| (id, tree.resolved_font_size(id)))
        .collect();

    if let Some(node) = tree.get_mut(root) {
        node.style.font_size = Some(f64::from(font_size_px));
    }

    for (id, original) in originals {
        let Some(node) = tree.get_mut(id) else {
            continue;
        };
        if node.is_text_bearing() {
            node.style.font_size = Some(rescale_px(original, ratio));
            node.style.padding_x = rescale_padding(node.style.padding_x, ratio);
            node.style.padding_y = rescale_padding(node.style.padding_y, ratio);
        }
        // Containers too: leaves have no children to space out.
        node.style.gap = rescale_px(node.style.gap, ratio);
    }
}
