//! RGBA color type and the palettes used by the token views.

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use tokensnap::draw::Color;
/// let red = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
/// let faded = Color::hex(0x1f2937).with_alpha(0.6);
/// assert_eq!(faded.a, 0.6);
/// assert_eq!(red.a, 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    /// Creates an opaque color from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as f64 / 255.0,
            g: ((rgb >> 8) & 0xff) as f64 / 255.0,
            b: (rgb & 0xff) as f64 / 255.0,
            a: 1.0,
        }
    }

    /// Returns the same color with a different alpha.
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    pub fn set_source(&self, ctx: &cairo::Context) {
        ctx.set_source_rgba(self.r, self.g, self.b, self.a);
    }
}

pub const WHITE: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

pub const BLACK: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

pub const TRANSPARENT: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

// ============================================================================
// Neutral tones (gray scale used for text, borders and card surfaces)
// ============================================================================

pub const GRAY_50: Color = Color::hex(0xf9fafb);
pub const GRAY_100: Color = Color::hex(0xf3f4f6);
pub const GRAY_200: Color = Color::hex(0xe5e7eb);
pub const GRAY_400: Color = Color::hex(0x9ca3af);
pub const GRAY_500: Color = Color::hex(0x6b7280);
pub const GRAY_700: Color = Color::hex(0x374151);
pub const GRAY_800: Color = Color::hex(0x1f2937);
pub const GRAY_900: Color = Color::hex(0x111827);

/// Label text color for annotated exports.
pub const LABEL_TEXT: Color = GRAY_800;

/// Background, text and border colors of one chip style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChipColors {
    pub background: Color,
    pub text: Color,
    pub border: Color,
}

const fn chip(background: u32, text: u32, border: u32) -> ChipColors {
    ChipColors {
        background: Color::hex(background),
        text: Color::hex(text),
        border: Color::hex(border),
    }
}

/// Rotating palette for token chips, indexed by token position.
pub const CHIP_PALETTE: [ChipColors; 10] = [
    chip(0xdbeafe, 0x1e40af, 0xbfdbfe), // blue
    chip(0xdcfce7, 0x166534, 0xbbf7d0), // green
    chip(0xfef9c3, 0x854d0e, 0xfef08a), // yellow
    chip(0xf3e8ff, 0x6b21a8, 0xe9d5ff), // purple
    chip(0xfce7f3, 0x9d174d, 0xfbcfe8), // pink
    chip(0xe0e7ff, 0x3730a3, 0xc7d2fe), // indigo
    chip(0xffedd5, 0x9a3412, 0xfed7aa), // orange
    chip(0xccfbf1, 0x115e59, 0x99f6e4), // teal
    chip(0xfee2e2, 0x991b1b, 0xfecaca), // red
    chip(0xcffafe, 0x155e75, 0xa5f3fc), // cyan
];

/// Returns the chip colors for the token at `index`.
pub fn chip_colors(index: usize) -> ChipColors {
    CHIP_PALETTE[index % CHIP_PALETTE.len()]
}

/// Badge colors (background, text) for variant attributes.
pub mod badge {
    use super::Color;

    pub const SPACE: (Color, Color) = (Color::hex(0xdbeafe), Color::hex(0x1d4ed8));
    pub const UPPER: (Color, Color) = (Color::hex(0xfee2e2), Color::hex(0xb91c1c));
    pub const TITLE: (Color, Color) = (Color::hex(0xfef9c3), Color::hex(0xa16207));
    pub const MIXED: (Color, Color) = (Color::hex(0xf3e8ff), Color::hex(0x7e22ce));
    pub const LOWER: (Color, Color) = (Color::hex(0xf3f4f6), Color::hex(0x374151));
    pub const PUNCT: (Color, Color) = (Color::hex(0xffedd5), Color::hex(0xc2410c));
}
