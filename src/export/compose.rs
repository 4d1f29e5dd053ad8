//! Label annotation stacked above a captured bitmap.

use super::types::{CapturedBitmap, ExportConfig, ExportError, SUPERSAMPLE_SCALE};
use crate::draw::{FontDescriptor, color::LABEL_TEXT, render_text};

/// Placement of the label and the captured content on the composed bitmap.
/// All values are supersampled pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelGeometry {
    pub padding: u32,
    pub font_size: u32,
    pub gap: u32,
    pub width: u32,
    pub height: u32,
}

impl LabelGeometry {
    pub fn compute(content_width: u32, content_height: u32, font_size_px: u32, min_width: u32) -> Self {
        let scale = SUPERSAMPLE_SCALE;
        let padding = 8 * scale;
        let font_size = (f64::from(font_size_px) * 0.9).round() as u32 * scale;
        let gap = 4 * scale;
        Self {
            padding,
            font_size,
            gap,
            width: content_width.max(min_width) + 2 * padding,
            height: content_height + 2 * padding + font_size + gap,
        }
    }

    /// Label baseline, left-aligned at the padding.
    pub fn baseline(&self) -> (u32, u32) {
        (self.padding, self.padding + self.font_size)
    }

    /// Top-left corner where the content is copied.
    pub fn content_origin(&self) -> (u32, u32) {
        (self.padding, self.padding + self.font_size + self.gap)
    }
}

/// Returns `bitmap` unchanged unless the config asks for a label, in which
/// case a new, taller bitmap is built with the label above the content.
///
/// `min_width` reserves content width for fixed-layout call sites.
pub fn compose_label(
    bitmap: CapturedBitmap,
    config: &ExportConfig,
    min_width: u32,
) -> Result<CapturedBitmap, ExportError> {
    if !config.include_label() {
        return Ok(bitmap);
    }

    let geometry = LabelGeometry::compute(bitmap.width, bitmap.height, config.font_size_px(), min_width);
    log::debug!(
        "Composing label {:?} -> {}x{}",
        config.label(),
        geometry.width,
        geometry.height
    );

    let content = bitmap.to_surface().map_err(compose_err)?;
    let surface = cairo::ImageSurface::create(
        cairo::Format::ARgb32,
        geometry.width as i32,
        geometry.height as i32,
    )
    .map_err(compose_err)?;
    {
        let ctx = cairo::Context::new(&surface).map_err(compose_err)?;

        let (label_x, baseline_y) = geometry.baseline();
        render_text(
            &ctx,
            f64::from(label_x),
            f64::from(baseline_y),
            config.label(),
            LABEL_TEXT,
            f64::from(geometry.font_size),
            &FontDescriptor::label(),
        );

        let (content_x, content_y) = geometry.content_origin();
        ctx.set_source_surface(&content, f64::from(content_x), f64::from(content_y))
            .map_err(compose_err)?;
        ctx.paint().map_err(compose_err)?;
    }

    CapturedBitmap::from_surface(surface)
        .map_err(|e| ExportError::EncodingFailure(e.to_string()))
}

fn compose_err(err: cairo::Error) -> ExportError {
    ExportError::EncodingFailure(format!("Label composition failed: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32) -> CapturedBitmap {
        let mut bitmap = CapturedBitmap::blank(width, height);
        for px in bitmap.pixels.chunks_mut(4) {
            px.copy_from_slice(&[40, 80, 120, 255]);
        }
        bitmap
    }

    #[test]
    fn extra_height_at_28px() {
        let geometry = LabelGeometry::compute(400, 100, 28, 0);
        // 2 * 32 + round(25.2) * 4 + 16
        assert_eq!(geometry.height - 100, 64 + 100 + 16);
        assert_eq!(geometry.width, 400 + 64);
        assert_eq!(geometry.baseline(), (32, 132));
        assert_eq!(geometry.content_origin(), (32, 148));
    }

    #[test]
    fn min_width_only_widens() {
        assert_eq!(LabelGeometry::compute(100, 10, 14, 2880).width, 2880 + 64);
        assert_eq!(LabelGeometry::compute(4000, 10, 14, 2880).width, 4000 + 64);
    }

    #[test]
    fn passes_through_without_label() {
        let bitmap = solid(10, 10);
        let out = compose_label(bitmap.clone(), &ExportConfig::default(), 2880).unwrap();
        assert_eq!(out, bitmap);
    }

    #[test]
    fn copies_content_below_label() {
        let config = ExportConfig::new(20).with_label("gpt2 · chips");
        let out = compose_label(solid(50, 30), &config, 0).unwrap();
        let geometry = LabelGeometry::compute(50, 30, 20, 0);

        assert_eq!((out.width, out.height), (geometry.width, geometry.height));
        let (x, y) = geometry.content_origin();
        assert_eq!(out.pixel(x, y), [40, 80, 120, 255]);
        assert_eq!(out.pixel(x + 49, y + 29), [40, 80, 120, 255]);
        // Padding around the content stays transparent.
        assert_eq!(out.pixel(x + 50, y + 29), [0, 0, 0, 0]);
        assert_eq!(out.pixel(0, out.height - 1), [0, 0, 0, 0]);
    }
}
