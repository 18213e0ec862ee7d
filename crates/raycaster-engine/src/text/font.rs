use anyhow::{Context, Result};
use noto_sans_mono_bitmap::{get_raster, FontWeight, RasterHeight};
use std::path::Path;

use crate::coords::Vec2;

/// Cache key for one rasterized glyph: character plus raster pixel height.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GlyphKey {
    pub ch: char,
    pub px: u16,
}

/// Coverage bitmap of one glyph, row-major, one byte per pixel.
#[derive(Debug, Clone)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
}

impl GlyphBitmap {
    /// Expands coverage into white RGBA8 with coverage in alpha.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.coverage
            .iter()
            .flat_map(|&a| [255, 255, 255, a])
            .collect()
    }
}

/// Placement of a glyph relative to the pen, in raster pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphMetrics {
    /// Top-left of the bitmap relative to (pen x, line top).
    pub offset: Vec2,
    pub size: Vec2,
    pub advance: f32,
}

/// Where glyph shapes come from.
pub enum GlyphSource {
    /// Noto Sans Mono bitmaps compiled into the binary.
    Builtin,
    /// A TrueType/OpenType font rasterized with fontdue.
    Font(Box<fontdue::Font>),
}

impl std::fmt::Debug for GlyphSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlyphSource::Builtin => f.write_str("GlyphSource::Builtin"),
            GlyphSource::Font(_) => f.write_str("GlyphSource::Font(..)"),
        }
    }
}

const BUILTIN_HEIGHTS: [RasterHeight; 4] = [
    RasterHeight::Size16,
    RasterHeight::Size20,
    RasterHeight::Size24,
    RasterHeight::Size32,
];

fn builtin_height(px: u16) -> RasterHeight {
    BUILTIN_HEIGHTS
        .iter()
        .copied()
        .find(|h| h.val() as u16 == px)
        .unwrap_or(RasterHeight::Size16)
}

impl GlyphSource {
    /// Loads `path` as a font file, or the built-in font when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(GlyphSource::Builtin);
        };

        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read font '{}'", path.display()))?;
        Self::from_font_bytes(&bytes)
            .with_context(|| format!("failed to parse font '{}'", path.display()))
    }

    pub fn from_font_bytes(bytes: &[u8]) -> Result<Self> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(GlyphSource::Font(Box::new(font)))
    }

    /// Raster height used for a requested font size, and the factor that
    /// scales raster pixels to screen pixels.
    pub fn raster_size(&self, font_size: f32) -> (u16, f32) {
        match self {
            GlyphSource::Builtin => {
                let h = BUILTIN_HEIGHTS
                    .iter()
                    .copied()
                    .find(|h| h.val() as f32 >= font_size)
                    .unwrap_or(RasterHeight::Size32);
                let px = h.val() as u16;
                (px, font_size / f32::from(px))
            }
            GlyphSource::Font(_) => {
                let px = font_size.round().clamp(1.0, f32::from(u16::MAX)) as u16;
                (px, font_size / f32::from(px))
            }
        }
    }

    pub fn metrics(&self, key: GlyphKey) -> GlyphMetrics {
        match self {
            GlyphSource::Builtin => {
                let w = builtin_raster(key)
                    .map(|r| r.width())
                    .unwrap_or(0) as f32;
                GlyphMetrics {
                    offset: Vec2::zero(),
                    size: Vec2::new(w, f32::from(key.px)),
                    advance: w,
                }
            }
            GlyphSource::Font(font) => {
                let px = f32::from(key.px);
                let m = font.metrics(key.ch, px);
                let ascent = font
                    .horizontal_line_metrics(px)
                    .map_or(px, |l| l.ascent);
                GlyphMetrics {
                    offset: Vec2::new(m.xmin as f32, ascent - m.ymin as f32 - m.height as f32),
                    size: Vec2::new(m.width as f32, m.height as f32),
                    advance: m.advance_width,
                }
            }
        }
    }

    /// Rasterizes one glyph. `None` when it has no visible pixels.
    pub fn rasterize(&self, key: GlyphKey) -> Option<GlyphBitmap> {
        let bitmap = match self {
            GlyphSource::Builtin => {
                let r = builtin_raster(key)?;
                let width = r.width() as u32;
                let height = r.height() as u32;
                let coverage = r
                    .raster()
                    .iter()
                    .flat_map(|row| row.iter().take(width as usize).copied())
                    .collect();
                GlyphBitmap {
                    width,
                    height,
                    coverage,
                }
            }
            GlyphSource::Font(font) => {
                let (m, coverage) = font.rasterize(key.ch, f32::from(key.px));
                GlyphBitmap {
                    width: m.width as u32,
                    height: m.height as u32,
                    coverage,
                }
            }
        };

        if bitmap.width == 0 || bitmap.height == 0 || bitmap.coverage.iter().all(|&a| a == 0) {
            return None;
        }
        Some(bitmap)
    }
}

/// Missing characters render as '?'.
fn builtin_raster(key: GlyphKey) -> Option<noto_sans_mono_bitmap::RasterizedChar> {
    let height = builtin_height(key.px);
    get_raster(key.ch, FontWeight::Regular, height)
        .or_else(|| get_raster('?', FontWeight::Regular, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_picks_smallest_raster_that_covers_size() {
        let src = GlyphSource::Builtin;
        assert_eq!(src.raster_size(10.0).0, 16);
        assert_eq!(src.raster_size(20.0).0, 20);
        assert_eq!(src.raster_size(21.0).0, 24);
        let (px, scale) = src.raster_size(64.0);
        assert_eq!(px, 32);
        assert!((scale - 2.0).abs() < 1e-6);
    }

    #[test]
    fn builtin_glyphs_are_monospace() {
        let src = GlyphSource::Builtin;
        let a = src.metrics(GlyphKey { ch: 'i', px: 20 });
        let b = src.metrics(GlyphKey { ch: 'W', px: 20 });
        assert!(a.advance > 0.0);
        assert_eq!(a.advance, b.advance);
        assert_eq!(a.size.y, 20.0);
    }

    #[test]
    fn space_has_no_bitmap() {
        let src = GlyphSource::Builtin;
        assert!(src.rasterize(GlyphKey { ch: ' ', px: 16 }).is_none());
    }

    #[test]
    fn letter_bitmap_matches_metrics() {
        let src = GlyphSource::Builtin;
        let key = GlyphKey { ch: 'A', px: 24 };
        let bmp = src.rasterize(key).unwrap();
        let m = src.metrics(key);
        assert_eq!(bmp.width as f32, m.size.x);
        assert_eq!(bmp.height as f32, m.size.y);
        assert_eq!(bmp.coverage.len(), (bmp.width * bmp.height) as usize);
        assert_eq!(bmp.to_rgba8().len(), bmp.coverage.len() * 4);
    }

    #[test]
    fn missing_font_file_is_an_error() {
        let err = GlyphSource::load(Some(Path::new("/definitely/not/a/font.ttf"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read font"));
    }
}
