//! Texture handles.
//!
//! Callers never see backend texture objects; they hold a [`TextureId`] and
//! the renderer resolves it through a [`TextureTable`] at draw time.

mod table;

pub use table::{TextureId, TextureTable};

/// Pixel dimensions of a loaded texture.
///
/// Implemented by every backend texture type so the entry points can map
/// normalized texture coordinates to texel columns without knowing the backend.
pub trait TextureSize {
    fn size(&self) -> (u32, u32);

    #[inline]
    fn width(&self) -> u32 {
        self.size().0
    }

    #[inline]
    fn height(&self) -> u32 {
        self.size().1
    }
}
