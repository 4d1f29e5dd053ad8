//! Cairo painter for laid-out fragments.

use super::layout::{LayoutBox, TextMeasure, layout};
use super::tree::RenderTree;
use super::tree::NodeId;
use crate::draw::{FontDescriptor, render::text_layout, rounded_rect};
use crate::export::types::{CapturedBitmap, ExportError};

/// Text measurer backed by a Pango layout on a Cairo context.
pub struct PangoMeasure {
    ctx: cairo::Context,
}

impl PangoMeasure {
    pub fn new(ctx: &cairo::Context) -> Self {
        Self { ctx: ctx.clone() }
    }
}

impl TextMeasure for PangoMeasure {
    fn measure(&self, text: &str, font: &FontDescriptor, size_px: f64) -> (f64, f64) {
        let layout = text_layout(&self.ctx, text, font, size_px);
        let (_ink, logical) = layout.extents();
        (
            logical.width() as f64 / pango::SCALE as f64,
            logical.height() as f64 / pango::SCALE as f64,
        )
    }
}

/// Lays out and paints the subtree at `root` onto a transparent surface
/// `scale` times larger than its CSS pixel size.
pub fn rasterize(tree: &RenderTree, root: NodeId, scale: u32) -> Result<CapturedBitmap, ExportError> {
    let scale = f64::from(scale.max(1));

    // Measure on a context with the same transform as the final one so
    // hinting matches between layout and paint.
    let scratch = cairo::ImageSurface::create(cairo::Format::ARgb32, 1, 1).map_err(capture_err)?;
    let measure_ctx = cairo::Context::new(&scratch).map_err(capture_err)?;
    measure_ctx.scale(scale, scale);
    let laid = layout(tree, root, &PangoMeasure::new(&measure_ctx))
        .ok_or_else(|| ExportError::CaptureFailure("node vanished before layout".to_string()))?;
    drop(measure_ctx);

    let width = (laid.rect.width * scale).ceil() as i32;
    let height = (laid.rect.height * scale).ceil() as i32;
    if width <= 0 || height <= 0 {
        return Err(ExportError::CaptureFailure(format!(
            "element has no visible size ({}x{})",
            laid.rect.width, laid.rect.height
        )));
    }

    log::debug!(
        "Rasterizing {}x{} css px at scale {} -> {}x{}",
        laid.rect.width,
        laid.rect.height,
        scale,
        width,
        height
    );

    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)
        .map_err(capture_err)?;
    {
        let ctx = cairo::Context::new(&surface).map_err(capture_err)?;
        ctx.set_operator(cairo::Operator::Clear);
        ctx.paint().map_err(capture_err)?;
        ctx.set_operator(cairo::Operator::Over);
        ctx.scale(scale, scale);
        paint_box(&ctx, tree, &laid)?;
    }

    CapturedBitmap::from_surface(surface)
}

fn paint_box(ctx: &cairo::Context, tree: &RenderTree, laid: &LayoutBox) -> Result<(), ExportError> {
    let Some(node) = tree.get(laid.node) else {
        return Ok(());
    };
    let style = &node.style;
    let rect = laid.rect;

    if let Some(background) = style.background {
        rounded_rect(ctx, rect.x, rect.y, rect.width, rect.height, style.radius);
        background.set_source(ctx);
        ctx.fill().map_err(capture_err)?;
    }

    if let Some(border) = style.border.filter(|_| style.border_width > 0.0) {
        let half = style.border_width / 2.0;
        rounded_rect(
            ctx,
            rect.x + half,
            rect.y + half,
            rect.width - style.border_width,
            rect.height - style.border_width,
            (style.radius - half).max(0.0),
        );
        border.set_source(ctx);
        ctx.set_line_width(style.border_width);
        ctx.stroke().map_err(capture_err)?;
    }

    if laid.children.is_empty() && node.is_text_bearing() {
        let text = node.text.as_deref().unwrap_or_default();
        let size = tree.resolved_font_size(laid.node);
        let font = tree.resolved_font(laid.node);
        let layout = text_layout(ctx, text, &font, size);
        ctx.move_to(
            rect.x + style.padding_x + style.border_width,
            rect.y + style.padding_y + style.border_width,
        );
        tree.resolved_color(laid.node).set_source(ctx);
        pangocairo::functions::show_layout(ctx, &layout);
    }

    for child in &laid.children {
        paint_box(ctx, tree, child)?;
    }
    Ok(())
}

fn capture_err(err: impl std::fmt::Display) -> ExportError {
    ExportError::CaptureFailure(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{CHIP_PALETTE, GRAY_900};
    use crate::scene::style::Style;
    use crate::scene::tree::{Node, Role};

    #[test]
    fn rasterize_scales_box_dimensions() {
        let mut tree = RenderTree::new();
        let root = tree.insert(Node::new(
            Role::Container,
            Style::block().width(10.0).padding(0.0, 5.0).background(GRAY_900),
        ));
        tree.attach_root(root);

        let bitmap = rasterize(&tree, root, 4).unwrap();
        assert_eq!(bitmap.width, 40);
        assert_eq!(bitmap.height, 40);
        // Opaque background fills every pixel.
        assert!(bitmap.pixels.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn rasterize_keeps_transparent_background() {
        let mut tree = RenderTree::new();
        let root = tree.insert(Node::new(Role::Container, Style::block().padding(4.0, 4.0)));
        let chip = tree.add_child(
            root,
            Node::with_text(
                Role::Chip,
                "fox",
                Style::block()
                    .font_size(14.0)
                    .padding(4.0, 2.0)
                    .background(CHIP_PALETTE[0].background),
            ),
        );
        tree.attach_root(root);
        assert!(tree.get(chip).is_some());

        let bitmap = rasterize(&tree, root, 4).unwrap();
        // The root padding is never painted.
        assert_eq!(bitmap.pixel(0, 0), [0, 0, 0, 0]);
        assert!(bitmap.pixels.chunks(4).any(|px| px[3] == 255));
    }

    #[test]
    fn rasterize_rejects_zero_size() {
        let mut tree = RenderTree::new();
        let root = tree.insert(Node::new(Role::Container, Style::block()));
        let err = rasterize(&tree, root, 4).unwrap_err();
        assert!(matches!(err, ExportError::CaptureFailure(_)));
    }
}
