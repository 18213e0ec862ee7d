//! Backend seam.
//!
//! `Renderer` records draw commands and resolves texture handles; a
//! [`Backend`] turns a recorded frame into pixels and supplies input.
//! [`crate::window::WindowBackend`] drives a real window, [`HeadlessBackend`]
//! records frames for tests and tooling.

mod headless;

use std::path::Path;

use anyhow::Result;

use crate::input::InputState;
use crate::paint::Color;
use crate::scene::DrawList;
use crate::text::GlyphSource;
use crate::texture::{TextureSize, TextureTable};

pub use headless::{HeadlessBackend, HeadlessTexture, RecordedFrame, DEFAULT_FRAME_HISTORY};

/// Everything a backend needs to present one frame.
pub struct Frame<'a, T> {
    pub clear: Color,
    pub commands: &'a DrawList,
    pub textures: &'a TextureTable<T>,
    pub glyphs: &'a GlyphSource,
}

pub trait Backend {
    /// Backend-side texture resource stored in the renderer's texture table.
    type Texture: TextureSize;

    /// Processes pending window events without blocking.
    fn poll_events(&mut self);

    /// `true` once the window was asked to close (close button, fatal
    /// surface error, or [`Backend::request_close`]).
    fn close_requested(&self) -> bool;

    fn request_close(&mut self);

    /// Decodes the image at `path` into a backend texture.
    fn load_texture(&mut self, path: &Path) -> Result<Self::Texture>;

    /// Draws and presents one frame.
    fn submit(&mut self, frame: Frame<'_, Self::Texture>);

    fn input(&self) -> &InputState;

    /// Tears down the window. Textures have already been released.
    fn shutdown(&mut self) {}
}
