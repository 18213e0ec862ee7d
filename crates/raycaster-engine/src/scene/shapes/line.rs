use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};

/// Line segment draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCmd {
    pub start: Vec2,
    pub end: Vec2,
    /// Line thickness in logical pixels.
    pub thickness: f32,
    pub color: Color,
}

impl DrawList {
    /// Records a line segment.
    #[inline]
    pub fn push_line(&mut self, start: Vec2, end: Vec2, thickness: f32, color: Color) {
        self.push(DrawCmd::Line(LineCmd { start, end, thickness, color }));
    }
}
