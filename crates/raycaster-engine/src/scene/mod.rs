//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands for one frame
//! - preserve call order (paint order == insertion order)
//! - keep shape-specific payloads and push helpers under `scene::shapes`

mod cmd;
mod list;

pub mod shapes;

pub use cmd::DrawCmd;
pub use list::DrawList;
pub use shapes::line::LineCmd;
pub use shapes::rect::RectCmd;
pub use shapes::text::TextCmd;
pub use shapes::texture::TextureCmd;
