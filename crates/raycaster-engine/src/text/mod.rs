//! Text: glyph sources, block layout and atlas packing.
//!
//! Layout is pure CPU work; the GPU side lives in `render::atlas`.

mod font;
mod layout;
mod packer;

pub use font::{GlyphBitmap, GlyphKey, GlyphMetrics, GlyphSource};
pub use layout::{layout_text, measure_text, letter_spacing, line_advance, PlacedGlyph, MIN_FONT_SIZE};
pub use packer::ShelfPacker;
