//! GPU rendering subsystem.
//!
//! Every primitive is drawn by one textured-quad pipeline so that paint order
//! is exactly call order:
//! - `tessellate` turns a `scene::DrawList` into quad instances and
//!   texture runs (pure CPU, unit tested)
//! - `QuadRenderer` owns the pipeline and replays the runs
//! - `GlyphAtlas` caches rasterized glyphs in one RGBA texture
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shader converts to NDC using a viewport uniform.

mod atlas;
mod common;
mod ctx;
mod quad;
mod tessellate;

pub use atlas::GlyphAtlas;
pub use ctx::{RenderCtx, RenderTarget};
pub use quad::QuadRenderer;
pub use tessellate::{tessellate, QuadBatch, QuadBatches, QuadInstance, QuadTexture, UvRect};
