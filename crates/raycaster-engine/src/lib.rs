//! Raycaster render engine.
//!
//! A thin immediate-mode 2D layer (wall slices, sprites, rectangles, lines,
//! text, input polling) on top of `winit` + `wgpu`, exposed as a Rust API
//! ([`Renderer`]), a C ABI ([`ffi`]) and, through the `raycaster-mex` crate,
//! a string-command gateway for numeric environments.

pub mod backend;
pub mod coords;
pub mod device;
pub mod ffi;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod renderer;
pub mod scene;
pub mod text;
pub mod texture;
pub mod time;
pub mod window;

pub use backend::{Backend, HeadlessBackend};
pub use coords::{Rect, Vec2};
pub use input::{InputSnapshot, Key, KeyBindings, MouseButton};
pub use paint::Color;
pub use renderer::{Renderer, RendererConfig};
pub use texture::TextureId;
