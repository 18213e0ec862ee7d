use std::collections::HashMap;

use crate::device::GpuTexture;
use crate::text::{GlyphKey, GlyphSource, ShelfPacker};

use super::quad::QuadRenderer;
use super::tessellate::UvRect;

// ── atlas constants ────────────────────────────────────────────────────────

const ATLAS_SIZE: u32 = 1024;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

/// GPU glyph cache.
///
/// Glyphs are rasterized on first use and stored white-on-transparent in an
/// RGBA texture, so text is drawn by the same quad pipeline as everything
/// else with the text color as tint. Blank glyphs and glyphs that no longer
/// fit are cached as `None` and skipped.
pub struct GlyphAtlas {
    texture: GpuTexture,
    bind_group: wgpu::BindGroup,
    packer: ShelfPacker,
    cache: HashMap<GlyphKey, Option<UvRect>>,
    warned_full: bool,
}

impl GlyphAtlas {
    pub fn new(device: &wgpu::Device, quad: &QuadRenderer) -> Self {
        let texture = GpuTexture::empty(device, "raycaster glyph atlas", ATLAS_SIZE, ATLAS_SIZE);
        let bind_group = quad.bind_texture(device, &texture);

        Self {
            texture,
            bind_group,
            packer: ShelfPacker::new(ATLAS_SIZE, GLYPH_PADDING),
            cache: HashMap::new(),
            warned_full: false,
        }
    }

    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Returns the atlas cell of `key`, rasterizing and uploading on a miss.
    pub fn glyph_uv(
        &mut self,
        queue: &wgpu::Queue,
        source: &GlyphSource,
        key: GlyphKey,
    ) -> Option<UvRect> {
        if let Some(cached) = self.cache.get(&key) {
            return *cached;
        }

        let entry = self.place(queue, source, key);
        self.cache.insert(key, entry);
        entry
    }

    fn place(&mut self, queue: &wgpu::Queue, source: &GlyphSource, key: GlyphKey) -> Option<UvRect> {
        let bitmap = source.rasterize(key)?;

        let Some((x, y)) = self.packer.allocate(bitmap.width, bitmap.height) else {
            if !self.warned_full {
                log::warn!(
                    "glyph atlas is full ({ATLAS_SIZE}x{ATLAS_SIZE}); some glyphs will not be rendered"
                );
                self.warned_full = true;
            }
            return None;
        };

        self.texture
            .write_region(queue, x, y, bitmap.width, bitmap.height, &bitmap.to_rgba8());

        let size = ATLAS_SIZE as f32;
        Some(UvRect {
            min: [x as f32 / size, y as f32 / size],
            max: [
                (x + bitmap.width) as f32 / size,
                (y + bitmap.height) as f32 / size,
            ],
        })
    }
}
