use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};
use crate::texture::TextureId;

/// Textured quad draw payload.
///
/// `source` is in texels (negative width/height flip the image), `dest` is in
/// logical pixels. The quad is rotated by `rotation` degrees around
/// `dest.origin`, with `origin` giving the pivot offset inside `dest`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureCmd {
    pub texture: TextureId,
    pub source: Rect,
    pub dest: Rect,
    pub origin: Vec2,
    pub rotation: f32,
    pub tint: Color,
}

impl DrawList {
    /// Records a textured quad. The handle must already be resolved by the caller.
    pub fn push_texture(
        &mut self,
        texture: TextureId,
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    ) {
        self.push(DrawCmd::Texture(TextureCmd {
            texture,
            source,
            dest,
            origin,
            rotation,
            tint,
        }));
    }
}
