use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};

/// Text draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    /// Top-left of the text block in logical pixels.
    pub origin: Vec2,
    /// Font size (line height) in logical pixels.
    pub size: f32,
    pub color: Color,
}

impl DrawList {
    /// Records a text draw command.
    pub fn push_text(&mut self, text: impl Into<String>, origin: Vec2, size: f32, color: Color) {
        self.push(DrawCmd::Text(TextCmd {
            text: text.into(),
            origin,
            size,
            color,
        }));
    }
}
