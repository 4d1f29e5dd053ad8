//! Presentation attributes attached to render-tree nodes.

use crate::draw::{Color, FontDescriptor};

/// How a node arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    /// Children stacked vertically.
    Block,
    /// Children placed left to right, wrapping at the node's width when `wrap` is set.
    Row { wrap: bool },
    /// Children placed in a fixed number of equal-width columns.
    Grid { columns: u32 },
}

/// Box and typography attributes of a node. Lengths are CSS pixels.
///
/// `font_size`, `font` and `color` inherit from the nearest ancestor that sets
/// them; everything else applies to the node alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub display: Display,
    pub font_size: Option<f64>,
    pub font: Option<FontDescriptor>,
    pub color: Option<Color>,
    pub background: Option<Color>,
    pub border: Option<Color>,
    pub border_width: f64,
    pub radius: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub gap: f64,
    /// Forced outer width; `None` sizes the node to its content.
    pub width: Option<f64>,
    /// Positioned outside the visible page. Off-screen roots are never shown.
    pub offscreen: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            display: Display::Block,
            font_size: None,
            font: None,
            color: None,
            background: None,
            border: None,
            border_width: 0.0,
            radius: 0.0,
            padding_x: 0.0,
            padding_y: 0.0,
            gap: 0.0,
            width: None,
            offscreen: false,
        }
    }
}

impl Style {
    pub fn block() -> Self {
        Self::default()
    }

    pub fn row(wrap: bool) -> Self {
        Self {
            display: Display::Row { wrap },
            ..Self::default()
        }
    }

    pub fn offscreen(mut self) -> Self {
        self.offscreen = true;
        self
    }

    pub fn padding(mut self, x: f64, y: f64) -> Self {
        self.padding_x = x;
        self.padding_y = y;
        self
    }

    pub fn gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    pub fn font_size(mut self, px: f64) -> Self {
        self.font_size = Some(px);
        self
    }

    pub fn font(mut self, font: FontDescriptor) -> Self {
        self.font = Some(font);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// One-pixel border in `color`.
    pub fn border(mut self, color: Color) -> Self {
        self.border = Some(color);
        self.border_width = 1.0;
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }
}
