//! Cairo/Pango text and shape helpers.

use super::color::Color;
use super::font::FontDescriptor;

/// Creates a Pango layout on `ctx` holding `text` in `font` at `size_px`.
pub fn text_layout(
    ctx: &cairo::Context,
    text: &str,
    font: &FontDescriptor,
    size_px: f64,
) -> pango::Layout {
    let layout = pangocairo::functions::create_layout(ctx);
    let font_desc = font.to_pango_description(size_px);
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);
    layout
}

/// Renders a single run of text with its baseline at `(x, baseline_y)`.
///
/// Coordinates are in the user space of `ctx`, so callers that scale the
/// context get supersampled glyphs without changing their geometry.
pub fn render_text(
    ctx: &cairo::Context,
    x: f64,
    baseline_y: f64,
    text: &str,
    color: Color,
    size_px: f64,
    font: &FontDescriptor,
) {
    // Save context state to prevent settings from leaking to other drawing operations
    ctx.save().ok();

    // Gray antialiasing: subpixel rendering fringes on transparent surfaces
    ctx.set_antialias(cairo::Antialias::Gray);

    let layout = text_layout(ctx, text, font, size_px);

    // Pango positions layouts by their top-left corner
    let baseline = layout.baseline() as f64 / pango::SCALE as f64;
    ctx.move_to(x, baseline_y - baseline);

    color.set_source(ctx);
    pangocairo::functions::show_layout(ctx, &layout);

    ctx.restore().ok();
}

/// Adds a rounded rectangle path to `ctx`. A zero radius adds a plain rectangle.
pub fn rounded_rect(ctx: &cairo::Context, x: f64, y: f64, width: f64, height: f64, radius: f64) {
    let radius = radius.min(width / 2.0).min(height / 2.0).max(0.0);
    if radius == 0.0 {
        ctx.rectangle(x, y, width, height);
        return;
    }

    use std::f64::consts::{FRAC_PI_2, PI};
    ctx.new_sub_path();
    ctx.arc(x + width - radius, y + radius, radius, -FRAC_PI_2, 0.0);
    ctx.arc(x + width - radius, y + height - radius, radius, 0.0, FRAC_PI_2);
    ctx.arc(x + radius, y + height - radius, radius, FRAC_PI_2, PI);
    ctx.arc(x + radius, y + radius, radius, PI, PI + FRAC_PI_2);
    ctx.close_path();
}
