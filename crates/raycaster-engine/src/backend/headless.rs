use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::device::decode_image;
use crate::input::{InputEvent, InputState};
use crate::paint::Color;
use crate::scene::DrawCmd;
use crate::texture::TextureSize;

use super::{Backend, Frame};

/// A frame as submitted to [`HeadlessBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub clear: Color,
    pub commands: Vec<DrawCmd>,
}

/// Texture metadata. Pixels are decoded at load time to validate the file,
/// then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessTexture {
    pub path: PathBuf,
    width: u32,
    height: u32,
}

impl TextureSize for HeadlessTexture {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Frames [`HeadlessBackend::new`] keeps before dropping the oldest.
pub const DEFAULT_FRAME_HISTORY: usize = 64;

/// Backend without a window or GPU.
///
/// The most recent submitted frames are kept for inspection, input comes
/// from [`HeadlessBackend::push_input`], and close is only ever requested
/// programmatically. Images must pass the same decode and size checks as on
/// the window backend, using the default device limits.
#[derive(Debug)]
pub struct HeadlessBackend {
    frames: Vec<RecordedFrame>,
    frame_history: usize,
    max_texture_dimension: u32,
    input: InputState,
    close_requested: bool,
    polls: u64,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::with_frame_history(DEFAULT_FRAME_HISTORY)
    }
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps at most `frames` submitted frames (at least one).
    pub fn with_frame_history(frames: usize) -> Self {
        Self {
            frames: Vec::new(),
            frame_history: frames.max(1),
            max_texture_dimension: wgpu::Limits::default().max_texture_dimension_2d,
            input: InputState::default(),
            close_requested: false,
            polls: 0,
        }
    }

    /// Feeds an input event as if it came from a window.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.apply_event(&event);
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    /// Drains the recorded frames.
    pub fn take_frames(&mut self) -> Vec<RecordedFrame> {
        std::mem::take(&mut self.frames)
    }

    /// Number of `poll_events` calls so far.
    pub fn polls(&self) -> u64 {
        self.polls
    }
}

impl Backend for HeadlessBackend {
    type Texture = HeadlessTexture;

    fn poll_events(&mut self) {
        self.polls += 1;
    }

    fn close_requested(&self) -> bool {
        self.close_requested
    }

    fn request_close(&mut self) {
        self.close_requested = true;
    }

    fn load_texture(&mut self, path: &Path) -> Result<HeadlessTexture> {
        let (width, height) = decode_image(path, self.max_texture_dimension)?.dimensions();

        Ok(HeadlessTexture {
            path: path.to_path_buf(),
            width,
            height,
        })
    }

    fn submit(&mut self, frame: Frame<'_, HeadlessTexture>) {
        if self.frames.len() >= self.frame_history {
            let excess = self.frames.len() + 1 - self.frame_history;
            self.frames.drain(..excess);
        }
        self.frames.push(RecordedFrame {
            clear: frame.clear,
            commands: frame.commands.items().to_vec(),
        });
    }

    fn input(&self) -> &InputState {
        &self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::DrawList;
    use crate::text::GlyphSource;
    use crate::texture::TextureTable;

    fn submit(backend: &mut HeadlessBackend, color: Color) {
        let mut list = DrawList::new();
        list.push_rect(crate::coords::Rect::new(0.0, 0.0, 1.0, 1.0), color);
        let textures = TextureTable::<HeadlessTexture>::new();
        backend.submit(Frame {
            clear: Color::BLACK,
            commands: &list,
            textures: &textures,
            glyphs: &GlyphSource::Builtin,
        });
    }

    #[test]
    fn frame_history_is_bounded() {
        let mut backend = HeadlessBackend::with_frame_history(3);
        for shade in 0..10u8 {
            submit(&mut backend, Color::rgb(shade, 0, 0));
        }

        assert_eq!(backend.frames().len(), 3);
        let first = &backend.frames()[0].commands[0];
        assert!(matches!(first, DrawCmd::Rect(r) if r.color == Color::rgb(7, 0, 0)));
        let last = &backend.last_frame().unwrap().commands[0];
        assert!(matches!(last, DrawCmd::Rect(r) if r.color == Color::rgb(9, 0, 0)));
    }

    #[test]
    fn zero_history_still_keeps_last_frame() {
        let mut backend = HeadlessBackend::with_frame_history(0);
        submit(&mut backend, Color::RED);
        submit(&mut backend, Color::BLUE);
        assert_eq!(backend.frames().len(), 1);
        assert_eq!(backend.take_frames().len(), 1);
        assert!(backend.frames().is_empty());
    }
}
