use std::path::PathBuf;

use crate::device::GpuInit;
use crate::input::{Key, KeyBindings};
use crate::paint::Color;

/// Renderer configuration.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub title: String,

    /// Window size in logical pixels; also what `screen_width`/`screen_height` report.
    pub width: u32,
    pub height: u32,

    pub resizable: bool,

    /// Color every frame starts from.
    pub clear_color: Color,

    /// Holding this key makes `should_close` return `true`. `None` disables it.
    pub exit_key: Option<Key>,

    pub key_bindings: KeyBindings,

    /// Caps presentation to this rate by sleeping in `end_frame`.
    /// `None` leaves pacing to the present mode.
    pub target_fps: Option<u32>,

    /// TrueType/OpenType font for text. `None` uses the built-in monospace font.
    pub font_path: Option<PathBuf>,

    pub gpu: GpuInit,
}

impl RendererConfig {
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.width > 0 && self.height > 0,
            "window size must be positive, got {}x{}",
            self.width,
            self.height
        );
        Ok(())
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            title: "raycaster".to_string(),
            width: 800,
            height: 600,
            resizable: false,
            clear_color: Color::BLACK,
            exit_key: Some(Key::Escape),
            key_bindings: KeyBindings::default(),
            target_fps: None,
            font_path: None,
            gpu: GpuInit::default(),
        }
    }
}
