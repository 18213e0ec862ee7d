use crate::coords::{Rect, Vec2};

use super::{GlyphKey, GlyphSource};

/// Smallest size text is drawn at.
pub const MIN_FONT_SIZE: f32 = 10.0;

/// A glyph positioned on screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlacedGlyph {
    pub key: GlyphKey,
    pub dest: Rect,
}

/// Horizontal gap between glyphs: one tenth of the size, whole pixels.
#[inline]
pub fn letter_spacing(font_size: f32) -> f32 {
    (font_size / MIN_FONT_SIZE).floor()
}

/// Distance between baselines of consecutive lines.
#[inline]
pub fn line_advance(font_size: f32) -> f32 {
    (font_size * 1.5).floor()
}

/// Lays out `text` as one block with its top-left at `origin`.
///
/// `\n` returns to `origin.x` and moves down one line. Whitespace advances
/// the pen without producing glyphs.
pub fn layout_text(
    source: &GlyphSource,
    text: &str,
    origin: Vec2,
    font_size: f32,
) -> Vec<PlacedGlyph> {
    let mut out = Vec::with_capacity(text.len());
    walk(source, text, font_size, |key, pen, m, scale| {
        if key.ch.is_whitespace() {
            return;
        }
        let pos = origin + pen + m.offset * scale;
        out.push(PlacedGlyph {
            key,
            dest: Rect::new(pos.x, pos.y, m.size.x * scale, m.size.y * scale),
        });
    });
    out
}

/// Size of the block `layout_text` would produce.
pub fn measure_text(source: &GlyphSource, text: &str, font_size: f32) -> Vec2 {
    let size = font_size.max(MIN_FONT_SIZE);
    let mut width = 0.0f32;
    walk(source, text, font_size, |_, pen, m, scale| {
        width = width.max(pen.x + m.advance * scale);
    });
    let lines = text.matches('\n').count() + 1;

    Vec2::new(width, line_advance(size) * (lines - 1) as f32 + size)
}

fn walk<F>(source: &GlyphSource, text: &str, font_size: f32, mut visit: F)
where
    F: FnMut(GlyphKey, Vec2, super::GlyphMetrics, f32),
{
    let size = font_size.max(MIN_FONT_SIZE);
    let (px, scale) = source.raster_size(size);
    let spacing = letter_spacing(size);

    let mut pen = Vec2::zero();
    for ch in text.chars() {
        if ch == '\n' {
            pen.x = 0.0;
            pen.y += line_advance(size);
            continue;
        }

        let key = GlyphKey { ch, px };
        let m = source.metrics(key);
        visit(key, pen, m, scale);
        pen.x += m.advance * scale + spacing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin_advance(size: f32) -> f32 {
        let src = GlyphSource::Builtin;
        let (px, scale) = src.raster_size(size);
        src.metrics(GlyphKey { ch: 'a', px }).advance * scale + letter_spacing(size)
    }

    #[test]
    fn glyphs_advance_monospace_from_origin() {
        let src = GlyphSource::Builtin;
        let glyphs = layout_text(&src, "abc", Vec2::new(10.0, 20.0), 20.0);
        assert_eq!(glyphs.len(), 3);

        let step = builtin_advance(20.0);
        assert_eq!(glyphs[0].dest.x(), 10.0);
        assert_eq!(glyphs[0].dest.y(), 20.0);
        assert!((glyphs[2].dest.x() - (10.0 + 2.0 * step)).abs() < 1e-4);
        assert_eq!(glyphs[2].key.ch, 'c');
    }

    #[test]
    fn newline_starts_new_line_at_origin_x() {
        let src = GlyphSource::Builtin;
        let glyphs = layout_text(&src, "ab\ncd", Vec2::new(5.0, 0.0), 20.0);
        assert_eq!(glyphs.len(), 4);
        assert_eq!(glyphs[2].key.ch, 'c');
        assert_eq!(glyphs[2].dest.x(), 5.0);
        assert_eq!(glyphs[2].dest.y(), line_advance(20.0));
    }

    #[test]
    fn spaces_advance_without_glyphs() {
        let src = GlyphSource::Builtin;
        let glyphs = layout_text(&src, "a b", Vec2::zero(), 20.0);
        assert_eq!(glyphs.len(), 2);
        assert!((glyphs[1].dest.x() - 2.0 * builtin_advance(20.0)).abs() < 1e-4);
    }

    #[test]
    fn small_sizes_clamp_to_minimum() {
        let src = GlyphSource::Builtin;
        let tiny = layout_text(&src, "a", Vec2::zero(), 2.0);
        let min = layout_text(&src, "a", Vec2::zero(), MIN_FONT_SIZE);
        assert_eq!(tiny, min);
        assert_eq!(tiny[0].dest.height(), MIN_FONT_SIZE);
    }

    #[test]
    fn measure_counts_lines() {
        let src = GlyphSource::Builtin;
        let one = measure_text(&src, "abc", 20.0);
        let two = measure_text(&src, "abc\nab", 20.0);
        assert_eq!(one.x, two.x);
        assert_eq!(one.y, 20.0);
        assert_eq!(two.y, 20.0 + line_advance(20.0));
    }

    #[test]
    fn empty_text_has_no_glyphs() {
        let src = GlyphSource::Builtin;
        assert!(layout_text(&src, "", Vec2::zero(), 20.0).is_empty());
    }
}
