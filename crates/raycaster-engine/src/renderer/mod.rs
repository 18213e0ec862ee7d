//! Drawing entry points.
//!
//! [`Renderer`] is the immediate-mode surface the test host, the host adapter
//! and the C ABI drive. Calls between `begin_frame` and `end_frame` are
//! recorded into a draw list; `end_frame` hands the list to the backend,
//! presents, and polls window events.
//!
//! Texture handles are resolved here: a draw with a handle that is not in the
//! table is replaced by a magenta placeholder fill and never fails.

mod config;

use std::path::Path;

use anyhow::{Context, Result};

use crate::backend::{Backend, Frame, HeadlessBackend};
use crate::coords::{Rect, Vec2};
use crate::input::{InputSnapshot, Key, MouseButton};
use crate::paint::Color;
use crate::scene::DrawList;
use crate::text::{measure_text, GlyphSource};
use crate::texture::{TextureId, TextureSize, TextureTable};
use crate::time::{FrameClock, FramePacer};
use crate::window::WindowBackend;

pub use config::RendererConfig;

/// Line primitives are one pixel wide.
const LINE_THICKNESS: f32 = 1.0;

/// Integer pixel coordinate → centre of that pixel.
#[inline]
fn pixel_center(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32 + 0.5, y as f32 + 0.5)
}

/// An initialized renderer.
///
/// There is no "uninitialized" renderer value: [`Renderer::init`] (or
/// [`Renderer::with_backend`]) produces one and [`Renderer::shutdown`]
/// consumes it.
pub struct Renderer<B: Backend = WindowBackend> {
    backend: B,
    textures: TextureTable<B::Texture>,
    draw_list: DrawList,
    glyphs: GlyphSource,
    clock: FrameClock,
    pacer: Option<FramePacer>,
    config: RendererConfig,
}

impl Renderer<WindowBackend> {
    /// Opens a window and creates the GPU context.
    ///
    /// The only entry point that reports failure.
    pub fn init(config: RendererConfig) -> Result<Self> {
        config.validate()?;
        let backend = WindowBackend::new(&config).context("failed to initialize renderer")?;
        Self::with_backend(backend, config)
    }
}

impl Renderer<HeadlessBackend> {
    /// Renderer without a window; frames are recorded by the backend.
    pub fn headless(config: RendererConfig) -> Result<Self> {
        Self::with_backend(HeadlessBackend::new(), config)
    }
}

impl<B: Backend> Renderer<B> {
    pub fn with_backend(backend: B, config: RendererConfig) -> Result<Self> {
        config.validate()?;
        let glyphs = GlyphSource::load(config.font_path.as_deref())?;

        log::info!(
            "renderer initialized: {}x{} '{}'",
            config.width,
            config.height,
            config.title
        );

        Ok(Self {
            backend,
            textures: TextureTable::new(),
            draw_list: DrawList::new(),
            glyphs,
            clock: FrameClock::new(),
            pacer: config.target_fps.and_then(FramePacer::new),
            config,
        })
    }

    /// Releases every texture and closes the window.
    pub fn shutdown(mut self) {
        self.textures.drain_with(|id, texture| {
            log::debug!("releasing texture {id}");
            drop(texture);
        });
        self.backend.shutdown();
        log::info!("renderer shut down");
    }

    // ── lifecycle ──────────────────────────────────────────────────────────

    /// `true` once a close was requested: window close button, the configured
    /// exit key, a fatal surface error, or [`Renderer::request_close`].
    pub fn should_close(&self) -> bool {
        self.backend.close_requested()
            || self
                .config
                .exit_key
                .is_some_and(|key| self.backend.input().key_down(key))
    }

    pub fn request_close(&mut self) {
        self.backend.request_close();
    }

    /// Starts recording a frame; the frame is cleared to the configured color.
    pub fn begin_frame(&mut self) {
        self.draw_list.clear();
    }

    /// Presents the recorded frame and polls window events.
    pub fn end_frame(&mut self) {
        self.backend.submit(Frame {
            clear: self.config.clear_color,
            commands: &self.draw_list,
            textures: &self.textures,
            glyphs: &self.glyphs,
        });
        self.draw_list.clear();

        if let Some(pacer) = self.pacer.as_mut() {
            pacer.wait();
        }
        self.clock.tick();

        self.backend.poll_events();
    }

    // ── textures ───────────────────────────────────────────────────────────

    /// Loads an image file. Returns [`TextureId::INVALID`] on failure.
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> TextureId {
        let backend = &mut self.backend;
        self.textures
            .load_with(path.as_ref(), |p| backend.load_texture(p))
    }

    /// Releases a texture. Unknown handles are ignored.
    pub fn unload_texture(&mut self, id: TextureId) {
        drop(self.textures.remove(id));
    }

    pub fn texture_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.textures.get(id).map(TextureSize::size)
    }

    // ── drawing ────────────────────────────────────────────────────────────

    /// One-pixel vertical line at column `x`.
    pub fn draw_wall_slice(&mut self, x: i32, start_y: i32, end_y: i32, color: Color) {
        self.draw_line(x, start_y, x, end_y, color);
    }

    /// Vertical strip of a texture: the column at normalized `tex_u`
    /// stretched over `(x, start_y)..(x + width, end_y)`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_textured_wall_slice(
        &mut self,
        x: i32,
        start_y: i32,
        end_y: i32,
        width: f32,
        texture: TextureId,
        tex_u: f32,
        tint: Color,
    ) {
        // Widened before subtracting; host coordinates span the full i32 range.
        let height = (i64::from(end_y) - i64::from(start_y)) as f32;

        let Some((tw, th)) = self.texture_size(texture) else {
            self.draw_list.push_rect(
                Rect::new(x as f32, start_y as f32, width.trunc(), height),
                Color::PLACEHOLDER,
            );
            return;
        };

        let column = texture_column(tex_u, tw);
        self.draw_list.push_texture(
            texture,
            Rect::new(column as f32, 0.0, 1.0, th as f32),
            Rect::new(x as f32, start_y as f32, width, height),
            Vec2::zero(),
            0.0,
            tint,
        );
    }

    /// Draws `source` (texels) of a texture into `dest`, rotated `rotation`
    /// degrees around `dest.origin` with `origin` as the pivot offset.
    pub fn draw_sprite(
        &mut self,
        texture: TextureId,
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    ) {
        if !self.textures.contains(texture) {
            self.draw_list.push_rect(dest, Color::PLACEHOLDER);
            return;
        }
        self.draw_list
            .push_texture(texture, source, dest, origin, rotation, tint);
    }

    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        self.draw_list
            .push_rect(Rect::from_ints(x, y, width, height), color);
    }

    /// One-pixel line between two pixel positions.
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        self.draw_list.push_line(
            pixel_center(x1, y1),
            pixel_center(x2, y2),
            LINE_THICKNESS,
            color,
        );
    }

    /// Text block with its top-left at `(x, y)`; `\n` starts a new line.
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, font_size: i32, color: Color) {
        if text.is_empty() {
            return;
        }
        self.draw_list
            .push_text(text, Vec2::new(x as f32, y as f32), font_size as f32, color);
    }

    /// Size `draw_text` would cover.
    pub fn measure_text(&self, text: &str, font_size: i32) -> Vec2 {
        measure_text(&self.glyphs, text, font_size as f32)
    }

    // ── queries ────────────────────────────────────────────────────────────

    pub fn screen_width(&self) -> i32 {
        i32::try_from(self.config.width).unwrap_or(i32::MAX)
    }

    pub fn screen_height(&self) -> i32 {
        i32::try_from(self.config.height).unwrap_or(i32::MAX)
    }

    pub fn input_snapshot(&self) -> InputSnapshot {
        InputSnapshot::capture(self.backend.input(), &self.config.key_bindings)
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.backend.input().key_down(key)
    }

    pub fn mouse_button_down(&self, button: MouseButton) -> bool {
        self.backend.input().button_down(button)
    }

    pub fn mouse_position(&self) -> Vec2 {
        let (x, y) = self.backend.input().pointer_pos;
        Vec2::new(x, y)
    }

    /// Delta time of the last presented frame, in seconds.
    pub fn frame_time(&self) -> f32 {
        self.clock.last_dt()
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

/// Texel column for a normalized coordinate, clamped into the texture.
fn texture_column(tex_u: f32, texture_width: u32) -> u32 {
    let last = texture_width.saturating_sub(1);
    let column = (tex_u * texture_width as f32).trunc();
    if column.is_nan() || column < 0.0 {
        0
    } else {
        (column as u32).min(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_column_truncates() {
        assert_eq!(texture_column(0.0, 64), 0);
        assert_eq!(texture_column(0.5, 64), 32);
        assert_eq!(texture_column(0.999, 64), 63);
    }

    #[test]
    fn texture_column_clamps_out_of_range() {
        assert_eq!(texture_column(1.0, 64), 63);
        assert_eq!(texture_column(7.5, 64), 63);
        assert_eq!(texture_column(-0.3, 64), 0);
        assert_eq!(texture_column(f32::NAN, 64), 0);
    }

    #[test]
    fn pixel_center_offsets_by_half() {
        assert_eq!(pixel_center(3, -2), Vec2::new(3.5, -1.5));
    }
}
