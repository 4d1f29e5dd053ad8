//! Drawing primitives shared by the painter and the label compositor.
//!
//! - [`Color`]: RGBA color representation plus the chip and badge palettes
//! - [`FontDescriptor`]: family/weight/style, converted to Pango descriptions
//! - [`render_text`]: baseline-anchored Pango text on a Cairo context

pub mod color;
pub mod font;
pub mod render;

pub use color::Color;
pub use font::FontDescriptor;
pub use render::{render_text, rounded_rect};
