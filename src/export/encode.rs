//! PNG and PDF encoding of the final bitmap.

use super::types::{CapturedBitmap, ExportError};

const MM_PER_INCH: f64 = 25.4;
const CSS_PX_PER_INCH: f64 = 96.0;
const PT_PER_INCH: f64 = 72.0;

/// Millimetres covered by one supersampled pixel.
pub fn px_to_mm(scale: u32) -> f64 {
    MM_PER_INCH / CSS_PX_PER_INCH / f64::from(scale.max(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Physical page size of a document export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub orientation: Orientation,
}

impl PageGeometry {
    /// Page that fits a `width × height` bitmap captured at `scale`.
    pub fn for_bitmap(width: u32, height: u32, scale: u32) -> Self {
        let mm = px_to_mm(scale);
        let width_mm = f64::from(width) * mm;
        let height_mm = f64::from(height) * mm;
        let orientation = if width_mm > height_mm {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        };
        Self {
            width_mm,
            height_mm,
            orientation,
        }
    }

    pub fn width_pt(&self) -> f64 {
        self.width_mm / MM_PER_INCH * PT_PER_INCH
    }

    pub fn height_pt(&self) -> f64 {
        self.height_mm / MM_PER_INCH * PT_PER_INCH
    }
}

/// Encodes the bitmap as PNG bytes.
pub fn encode_png(bitmap: &CapturedBitmap) -> Result<Vec<u8>, ExportError> {
    let surface = bitmap
        .to_surface()
        .map_err(|e| ExportError::EncodingFailure(format!("Invalid bitmap: {}", e)))?;
    let mut buffer = Vec::new();
    surface
        .write_to_png(&mut buffer)
        .map_err(|e| ExportError::EncodingFailure(format!("PNG encoding failed: {}", e)))?;
    log::debug!("Encoded PNG ({} bytes)", buffer.len());
    Ok(buffer)
}

/// Builds a single-page PDF whose page is exactly the bitmap's physical size,
/// with the bitmap filling the page from the origin.
pub fn encode_pdf(
    bitmap: &CapturedBitmap,
    scale: u32,
) -> Result<(Vec<u8>, PageGeometry), ExportError> {
    let page = PageGeometry::for_bitmap(bitmap.width, bitmap.height, scale);
    log::debug!(
        "PDF page {:.2}mm x {:.2}mm ({:?})",
        page.width_mm,
        page.height_mm,
        page.orientation
    );

    let image = bitmap.to_surface().map_err(pdf_err)?;
    let surface =
        cairo::PdfSurface::for_stream(page.width_pt(), page.height_pt(), Vec::<u8>::new())
            .map_err(pdf_err)?;
    {
        let ctx = cairo::Context::new(&surface).map_err(pdf_err)?;
        ctx.scale(
            page.width_pt() / f64::from(bitmap.width),
            page.height_pt() / f64::from(bitmap.height),
        );
        ctx.set_source_surface(&image, 0.0, 0.0).map_err(pdf_err)?;
        ctx.paint().map_err(pdf_err)?;
        ctx.show_page().map_err(pdf_err)?;
    }

    let stream = surface
        .finish_output_stream()
        .map_err(|e| ExportError::EncodingFailure(format!("PDF stream failed: {}", e)))?;
    let bytes = stream
        .downcast::<Vec<u8>>()
        .map_err(|_| ExportError::EncodingFailure("PDF stream had unexpected type".to_string()))?;
    Ok((*bytes, page))
}

fn pdf_err(err: cairo::Error) -> ExportError {
    ExportError::EncodingFailure(format!("PDF construction failed: {}", err))
}
