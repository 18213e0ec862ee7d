//! CPU side of the quad pipeline: draw commands → quad instances + batches.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};
use crate::text::{layout_text, GlyphKey, GlyphSource};
use crate::texture::TextureId;

/// Normalized texture coordinates of a quad's top-left and bottom-right.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UvRect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl UvRect {
    pub const FULL: UvRect = UvRect {
        min: [0.0, 0.0],
        max: [1.0, 1.0],
    };
}

/// One textured, possibly rotated quad.
///
/// Corner `q` (unit square) lands at `origin + axis_x * q.x + axis_y * q.y`
/// and samples `mix(uv_min, uv_max, q)`.
///
///  offset  0  origin  [f32; 2]   loc 1
///  offset  8  axis_x  [f32; 2]   loc 2
///  offset 16  axis_y  [f32; 2]   loc 3
///  offset 24  uv_min  [f32; 2]   loc 4
///  offset 32  uv_max  [f32; 2]   loc 5
///  offset 40  color   [f32; 4]   loc 6
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadInstance {
    pub origin: [f32; 2],
    pub axis_x: [f32; 2],
    pub axis_y: [f32; 2],
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    pub color: [f32; 4],
}

impl QuadInstance {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // axis_x
        3 => Float32x2, // axis_y
        4 => Float32x2, // uv_min
        5 => Float32x2, // uv_max
        6 => Float32x4  // color
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    fn axis_aligned(rect: Rect, uv: UvRect, color: Color) -> Self {
        Self {
            origin: rect.origin.to_array(),
            axis_x: [rect.size.x, 0.0],
            axis_y: [0.0, rect.size.y],
            uv_min: uv.min,
            uv_max: uv.max,
            color: color.to_f32(),
        }
    }

    /// Solid fill. Rectangles without positive area produce nothing.
    pub fn solid(rect: Rect, color: Color) -> Option<Self> {
        if !(rect.size.x > 0.0 && rect.size.y > 0.0) {
            return None;
        }
        Some(Self::axis_aligned(rect, UvRect::FULL, color))
    }

    /// Segment of the given thickness, centred on the line through `start`
    /// and `end`.
    pub fn line(start: Vec2, end: Vec2, thickness: f32, color: Color) -> Option<Self> {
        let dir = end - start;
        let len = dir.length();
        if !(len > 0.0 && thickness > 0.0) {
            return None;
        }

        let normal = dir.perp() * (thickness / len);
        Some(Self {
            origin: (start - normal * 0.5).to_array(),
            axis_x: dir.to_array(),
            axis_y: normal.to_array(),
            uv_min: UvRect::FULL.min,
            uv_max: UvRect::FULL.max,
            color: color.to_f32(),
        })
    }

    /// Glyph quad sampling an atlas cell.
    pub fn glyph(dest: Rect, uv: UvRect, color: Color) -> Self {
        Self::axis_aligned(dest, uv, color)
    }

    /// Texture sub-rectangle drawn into `dest`, rotated `rotation` degrees
    /// clockwise around `dest.origin`, with `origin` the pivot inside `dest`.
    ///
    /// `source` is in texels; a negative width or height mirrors the image
    /// while keeping the sampled region at `[x, x + |w|]` / `[y, y + |h|]`.
    pub fn sprite(
        texture_size: (u32, u32),
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    ) -> Option<Self> {
        let (tw, th) = texture_size;
        if tw == 0 || th == 0 || !(dest.size.x > 0.0 && dest.size.y > 0.0) {
            return None;
        }
        let (tw, th) = (tw as f32, th as f32);

        let (sx, sy) = (source.origin.x, source.origin.y);
        let (sw, sh) = (source.size.x.abs(), source.size.y.abs());

        let mut uv_min = [sx / tw, sy / th];
        let mut uv_max = [(sx + sw) / tw, (sy + sh) / th];
        if source.size.x < 0.0 {
            std::mem::swap(&mut uv_min[0], &mut uv_max[0]);
        }
        if source.size.y < 0.0 {
            std::mem::swap(&mut uv_min[1], &mut uv_max[1]);
        }

        let (sin, cos) = rotation.to_radians().sin_cos();
        let (dx, dy) = (-origin.x, -origin.y);
        let (w, h) = (dest.size.x, dest.size.y);

        Some(Self {
            origin: [
                dest.origin.x + dx * cos - dy * sin,
                dest.origin.y + dx * sin + dy * cos,
            ],
            axis_x: [w * cos, w * sin],
            axis_y: [-h * sin, h * cos],
            uv_min,
            uv_max,
            color: tint.to_f32(),
        })
    }
}

/// Texture bound for a run of quads.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum QuadTexture {
    /// 1x1 white texel; the quad color is the fill.
    White,
    /// The glyph atlas.
    Glyphs,
    /// A loaded image.
    Image(TextureId),
}

/// Consecutive instances sharing one texture.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadBatch {
    pub texture: QuadTexture,
    pub instances: Range<u32>,
}

/// Instances of one frame in paint order, split into texture runs.
#[derive(Debug, Default, Clone)]
pub struct QuadBatches {
    instances: Vec<QuadInstance>,
    batches: Vec<QuadBatch>,
}

impl QuadBatches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.batches.clear();
    }

    /// Appends an instance, extending the last batch when the texture matches.
    pub fn push(&mut self, texture: QuadTexture, instance: QuadInstance) {
        let index = self.instances.len() as u32;
        self.instances.push(instance);

        match self.batches.last_mut() {
            Some(last) if last.texture == texture => last.instances.end = index + 1,
            _ => self.batches.push(QuadBatch {
                texture,
                instances: index..index + 1,
            }),
        }
    }

    #[inline]
    pub fn instances(&self) -> &[QuadInstance] {
        &self.instances
    }

    #[inline]
    pub fn batches(&self) -> &[QuadBatch] {
        &self.batches
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Turns a draw list into quads.
///
/// `texture_size` resolves image handles; a handle that no longer resolves
/// is drawn as a placeholder fill of its destination. `glyph_uv` returns the
/// atlas cell of a glyph, or `None` to skip it (blank or atlas full).
pub fn tessellate<S, G>(
    list: &DrawList,
    texture_size: S,
    glyphs: &GlyphSource,
    mut glyph_uv: G,
    out: &mut QuadBatches,
) where
    S: Fn(TextureId) -> Option<(u32, u32)>,
    G: FnMut(GlyphKey) -> Option<UvRect>,
{
    out.clear();

    for cmd in list.items() {
        match cmd {
            DrawCmd::Rect(c) => {
                if let Some(q) = QuadInstance::solid(c.rect, c.color) {
                    out.push(QuadTexture::White, q);
                }
            }
            DrawCmd::Line(c) => {
                if let Some(q) = QuadInstance::line(c.start, c.end, c.thickness, c.color) {
                    out.push(QuadTexture::White, q);
                }
            }
            DrawCmd::Text(c) => {
                for g in layout_text(glyphs, &c.text, c.origin, c.size) {
                    let Some(uv) = glyph_uv(g.key) else { continue };
                    out.push(QuadTexture::Glyphs, QuadInstance::glyph(g.dest, uv, c.color));
                }
            }
            DrawCmd::Texture(c) => match texture_size(c.texture) {
                Some(size) => {
                    if let Some(q) =
                        QuadInstance::sprite(size, c.source, c.dest, c.origin, c.rotation, c.tint)
                    {
                        out.push(QuadTexture::Image(c.texture), q);
                    }
                }
                None => {
                    if let Some(q) = QuadInstance::solid(c.dest, Color::PLACEHOLDER) {
                        out.push(QuadTexture::White, q);
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4
    }

    #[test]
    fn solid_rect_is_axis_aligned() {
        let q = QuadInstance::solid(Rect::new(10.0, 20.0, 30.0, 40.0), Color::RED).unwrap();
        assert_eq!(q.origin, [10.0, 20.0]);
        assert_eq!(q.axis_x, [30.0, 0.0]);
        assert_eq!(q.axis_y, [0.0, 40.0]);
        assert_eq!(q.color, Color::RED.to_f32());
    }

    #[test]
    fn degenerate_rects_are_dropped() {
        assert!(QuadInstance::solid(Rect::new(0.0, 0.0, 0.0, 5.0), Color::RED).is_none());
        assert!(QuadInstance::solid(Rect::new(0.0, 0.0, 5.0, -1.0), Color::RED).is_none());
    }

    #[test]
    fn vertical_line_covers_one_pixel_column() {
        let q = QuadInstance::line(Vec2::new(5.5, 0.0), Vec2::new(5.5, 10.0), 1.0, Color::WHITE)
            .unwrap();
        // Quad spans x in [5, 6] along y in [0, 10].
        let corners = [
            q.origin,
            [q.origin[0] + q.axis_x[0], q.origin[1] + q.axis_x[1]],
            [q.origin[0] + q.axis_y[0], q.origin[1] + q.axis_y[1]],
        ];
        let xs: Vec<f32> = corners.iter().map(|c| c[0]).collect();
        assert!(xs.iter().all(|x| (5.0..=6.0).contains(x)));
        assert!((q.axis_x[1] - 10.0).abs() < 1e-6);
        assert!((q.axis_y[0].abs() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_length_line_is_dropped() {
        let p = Vec2::new(3.0, 3.0);
        assert!(QuadInstance::line(p, p, 1.0, Color::WHITE).is_none());
    }

    #[test]
    fn sprite_without_rotation_offsets_by_origin() {
        let q = QuadInstance::sprite(
            (64, 32),
            Rect::new(16.0, 8.0, 32.0, 16.0),
            Rect::new(100.0, 100.0, 64.0, 32.0),
            Vec2::new(32.0, 16.0),
            0.0,
            Color::WHITE,
        )
        .unwrap();

        assert!(close(q.origin, [68.0, 84.0]));
        assert!(close(q.axis_x, [64.0, 0.0]));
        assert!(close(q.axis_y, [0.0, 32.0]));
        assert!(close(q.uv_min, [0.25, 0.25]));
        assert!(close(q.uv_max, [0.75, 0.75]));
    }

    #[test]
    fn sprite_rotates_clockwise_about_pivot() {
        let q = QuadInstance::sprite(
            (8, 8),
            Rect::new(0.0, 0.0, 8.0, 8.0),
            Rect::new(50.0, 50.0, 10.0, 20.0),
            Vec2::new(5.0, 10.0),
            90.0,
            Color::WHITE,
        )
        .unwrap();

        // Pivot stays at dest.origin; the quad's top-left swings to (60, 45).
        assert!(close(q.origin, [60.0, 45.0]));
        assert!(close(q.axis_x, [0.0, 10.0]));
        assert!(close(q.axis_y, [-20.0, 0.0]));
    }

    #[test]
    fn negative_source_width_mirrors_same_region() {
        let q = QuadInstance::sprite(
            (10, 10),
            Rect::new(2.0, 0.0, -4.0, 10.0),
            Rect::new(0.0, 0.0, 4.0, 10.0),
            Vec2::zero(),
            0.0,
            Color::WHITE,
        )
        .unwrap();
        assert!(close(q.uv_min, [0.6, 0.0]));
        assert!(close(q.uv_max, [0.2, 1.0]));
    }

    #[test]
    fn negative_source_height_flips_vertically() {
        let q = QuadInstance::sprite(
            (10, 10),
            Rect::new(0.0, 0.0, 10.0, -10.0),
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Vec2::zero(),
            0.0,
            Color::WHITE,
        )
        .unwrap();
        assert!(close(q.uv_min, [0.0, 1.0]));
        assert!(close(q.uv_max, [1.0, 0.0]));
    }

    #[test]
    fn batches_split_only_on_texture_change() {
        let mut b = QuadBatches::new();
        let q = QuadInstance::solid(Rect::new(0.0, 0.0, 1.0, 1.0), Color::RED).unwrap();
        b.push(QuadTexture::White, q);
        b.push(QuadTexture::White, q);
        b.push(QuadTexture::Image(TextureId(1)), q);
        b.push(QuadTexture::White, q);

        let runs: Vec<_> = b.batches().iter().map(|r| (r.texture, r.instances.clone())).collect();
        assert_eq!(
            runs,
            vec![
                (QuadTexture::White, 0..2),
                (QuadTexture::Image(TextureId(1)), 2..3),
                (QuadTexture::White, 3..4),
            ]
        );
    }

    #[test]
    fn tessellate_keeps_call_order_across_kinds() {
        let mut list = DrawList::new();
        list.push_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::BLUE);
        list.push_texture(
            TextureId(7),
            Rect::new(0.0, 0.0, 4.0, 4.0),
            Rect::new(0.0, 0.0, 8.0, 8.0),
            Vec2::zero(),
            0.0,
            Color::WHITE,
        );
        list.push_text("hi".to_string(), Vec2::new(0.0, 0.0), 20.0, Color::RED);
        list.push_line(Vec2::new(0.0, 0.5), Vec2::new(10.0, 0.5), 1.0, Color::GREEN);

        let mut out = QuadBatches::new();
        tessellate(
            &list,
            |id| (id == TextureId(7)).then_some((4, 4)),
            &GlyphSource::Builtin,
            |_| Some(UvRect::FULL),
            &mut out,
        );

        let kinds: Vec<_> = out.batches().iter().map(|b| b.texture).collect();
        assert_eq!(
            kinds,
            vec![
                QuadTexture::White,
                QuadTexture::Image(TextureId(7)),
                QuadTexture::Glyphs,
                QuadTexture::White,
            ]
        );
        assert_eq!(out.instances().len(), 5);
        assert_eq!(out.instances()[4].color, Color::GREEN.to_f32());
    }

    #[test]
    fn unresolved_texture_falls_back_to_placeholder() {
        let mut list = DrawList::new();
        let dest = Rect::new(5.0, 6.0, 7.0, 8.0);
        list.push_texture(
            TextureId(3),
            Rect::new(0.0, 0.0, 1.0, 1.0),
            dest,
            Vec2::new(2.0, 2.0),
            45.0,
            Color::WHITE,
        );

        let mut out = QuadBatches::new();
        tessellate(&list, |_| None, &GlyphSource::Builtin, |_| None, &mut out);

        assert_eq!(out.batches()[0].texture, QuadTexture::White);
        let q = out.instances()[0];
        assert_eq!(q.origin, [5.0, 6.0]);
        assert_eq!(q.axis_x, [7.0, 0.0]);
        assert_eq!(q.color, Color::PLACEHOLDER.to_f32());
    }

    #[test]
    fn skipped_glyphs_emit_nothing() {
        let mut list = DrawList::new();
        list.push_text("abc".to_string(), Vec2::zero(), 20.0, Color::WHITE);

        let mut out = QuadBatches::new();
        tessellate(&list, |_| None, &GlyphSource::Builtin, |_| None, &mut out);
        assert!(out.is_empty());
    }
}
