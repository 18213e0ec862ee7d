//! Command parsing.
//!
//! The command string is resolved to a [`CommandName`] once, then the
//! remaining arguments are checked against that command's schema and
//! converted into a typed [`Command`]. Numeric scalars are truncated toward
//! zero wherever the engine takes integers.

use std::fmt;
use std::str::FromStr;

use raycaster_engine::{Color, Rect, TextureId, Vec2};

use crate::error::HostError;
use crate::value::Value;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CommandName {
    Init,
    Shutdown,
    ShouldClose,
    BeginFrame,
    EndFrame,
    DrawRect,
    DrawText,
    LoadTexture,
    UnloadTexture,
    DrawLine,
    GetScreenSize,
    GetInputState,
    DrawWallSlice,
    DrawTexturedWallSlice,
    DrawSprite,
}

impl CommandName {
    pub const ALL: [CommandName; 15] = [
        CommandName::Init,
        CommandName::Shutdown,
        CommandName::ShouldClose,
        CommandName::BeginFrame,
        CommandName::EndFrame,
        CommandName::DrawRect,
        CommandName::DrawText,
        CommandName::LoadTexture,
        CommandName::UnloadTexture,
        CommandName::DrawLine,
        CommandName::GetScreenSize,
        CommandName::GetInputState,
        CommandName::DrawWallSlice,
        CommandName::DrawTexturedWallSlice,
        CommandName::DrawSprite,
    ];

    /// Command string as the host spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            CommandName::Init => "init",
            CommandName::Shutdown => "shutdown",
            CommandName::ShouldClose => "shouldClose",
            CommandName::BeginFrame => "beginFrame",
            CommandName::EndFrame => "endFrame",
            CommandName::DrawRect => "drawRect",
            CommandName::DrawText => "drawText",
            CommandName::LoadTexture => "loadTexture",
            CommandName::UnloadTexture => "unloadTexture",
            CommandName::DrawLine => "drawLine",
            CommandName::GetScreenSize => "getScreenSize",
            CommandName::GetInputState => "getInputState",
            CommandName::DrawWallSlice => "drawWallSlice",
            CommandName::DrawTexturedWallSlice => "drawTexturedWallSlice",
            CommandName::DrawSprite => "drawSprite",
        }
    }

    pub fn usage(self) -> &'static str {
        match self {
            CommandName::Init => "init(width, height)",
            CommandName::Shutdown => "shutdown()",
            CommandName::ShouldClose => "tf = shouldClose()",
            CommandName::BeginFrame => "beginFrame()",
            CommandName::EndFrame => "endFrame()",
            CommandName::DrawRect => "drawRect(x, y, w, h, [R G B A])",
            CommandName::DrawText => "drawText('text', x, y, fontSize, [R G B A])",
            CommandName::LoadTexture => {
                "textureID = loadTexture('path/to/texture.png'). File path must be a string."
            }
            CommandName::UnloadTexture => {
                "unloadTexture(textureID). textureID must be a numeric scalar."
            }
            CommandName::DrawLine => {
                "drawLine(x1, y1, x2, y2, [R G B A]). Coordinates must be numeric scalars."
            }
            CommandName::GetScreenSize => "[width, height] = getScreenSize()",
            CommandName::GetInputState => "[inputStruct] = getInputState()",
            CommandName::DrawWallSlice => "drawWallSlice(x, startY, endY, [R G B A])",
            CommandName::DrawTexturedWallSlice => {
                "drawTexturedWallSlice(x, startY, endY, width, textureID, texU, [R G B A])"
            }
            CommandName::DrawSprite => {
                "drawSprite(textureID, [sx sy sw sh], [dx dy dw dh], [ox oy], rotation, [R G B A])"
            }
        }
    }

    /// Identifier for an argument-shape error of this command.
    pub fn args_error_id(self) -> &'static str {
        match self {
            CommandName::Init => "Renderer:Init",
            CommandName::DrawRect => "Renderer:drawRect",
            CommandName::DrawText => "Renderer:drawText",
            CommandName::LoadTexture => "Renderer:LoadTexture:Args",
            CommandName::UnloadTexture => "Renderer:UnloadTexture:Args",
            CommandName::DrawLine => "Renderer:DrawLine:Args",
            CommandName::GetScreenSize => "Renderer:GetScreenSize:Args",
            CommandName::GetInputState => "Renderer:GetInput:Args",
            CommandName::DrawWallSlice => "Renderer:DrawWallSlice:Args",
            CommandName::DrawTexturedWallSlice => "Renderer:DrawTexturedWallSlice:Args",
            CommandName::DrawSprite => "Renderer:DrawSprite:Args",
            CommandName::Shutdown
            | CommandName::ShouldClose
            | CommandName::BeginFrame
            | CommandName::EndFrame => "Renderer:InvalidInput",
        }
    }

    /// Identifier for a too-many-outputs error of this command.
    pub fn outputs_error_id(self) -> &'static str {
        match self {
            CommandName::LoadTexture => "Renderer:LoadTexture:Outputs",
            CommandName::GetScreenSize => "Renderer:GetScreenSize:Outputs",
            CommandName::GetInputState => "Renderer:GetInput:Outputs",
            _ => "Renderer:InvalidInput",
        }
    }
}

impl FromStr for CommandName {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| HostError::UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully validated gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Init {
        width: i32,
        height: i32,
    },
    Shutdown,
    ShouldClose,
    BeginFrame,
    EndFrame,
    DrawRect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    },
    DrawText {
        text: String,
        x: i32,
        y: i32,
        font_size: i32,
        color: Color,
    },
    LoadTexture {
        path: String,
    },
    UnloadTexture {
        texture: TextureId,
    },
    DrawLine {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    },
    GetScreenSize,
    GetInputState,
    DrawWallSlice {
        x: i32,
        start_y: i32,
        end_y: i32,
        color: Color,
    },
    DrawTexturedWallSlice {
        x: i32,
        start_y: i32,
        end_y: i32,
        width: f32,
        texture: TextureId,
        tex_u: f32,
        tint: Color,
    },
    DrawSprite {
        texture: TextureId,
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    },
}

/// Checked access to one command's arguments.
struct Args<'a> {
    name: CommandName,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    fn new(name: CommandName, values: &'a [Value], expected: usize) -> Result<Self, HostError> {
        if values.len() != expected {
            return Err(HostError::Args(name));
        }
        Ok(Self { name, values })
    }

    fn err(&self) -> HostError {
        HostError::Args(self.name)
    }

    fn scalar(&self, i: usize) -> Result<f64, HostError> {
        self.values[i].as_scalar().ok_or_else(|| self.err())
    }

    fn numeric(&self, i: usize) -> Result<f64, HostError> {
        self.values[i].as_numeric_scalar().ok_or_else(|| self.err())
    }

    fn int(&self, i: usize) -> Result<i32, HostError> {
        self.scalar(i).map(|v| v as i32)
    }

    fn numeric_int(&self, i: usize) -> Result<i32, HostError> {
        self.numeric(i).map(|v| v as i32)
    }

    fn texture(&self, i: usize) -> Result<TextureId, HostError> {
        self.numeric(i).map(|v| TextureId(v as u32))
    }

    fn text(&self, i: usize) -> Result<String, HostError> {
        self.values[i]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.err())
    }

    fn rect(&self, i: usize) -> Result<Rect, HostError> {
        let [x, y, w, h] = self.values[i].as_doubles::<4>().ok_or_else(|| self.err())?;
        Ok(Rect::new(x as f32, y as f32, w as f32, h as f32))
    }

    fn vec2(&self, i: usize) -> Result<Vec2, HostError> {
        let [x, y] = self.values[i].as_doubles::<2>().ok_or_else(|| self.err())?;
        Ok(Vec2::new(x as f32, y as f32))
    }

    /// Colors are checked after every other argument and have their own error.
    fn color(&self, i: usize) -> Result<Color, HostError> {
        self.values[i]
            .as_bytes::<4>()
            .map(Color::from_array)
            .ok_or(HostError::InvalidColor)
    }
}

fn max_outputs(name: CommandName, nlhs: usize, max: usize) -> Result<(), HostError> {
    if nlhs > max {
        Err(HostError::Outputs(name))
    } else {
        Ok(())
    }
}

impl Command {
    /// Validates `args` (command string excluded) against the schema of `name`.
    pub fn parse(name: CommandName, nlhs: usize, args: &[Value]) -> Result<Self, HostError> {
        use CommandName as N;

        let cmd = match name {
            N::Init => {
                let a = Args::new(name, args, 2)?;
                Command::Init {
                    width: a.int(0)?,
                    height: a.int(1)?,
                }
            }
            N::Shutdown => Command::Shutdown,
            N::ShouldClose => Command::ShouldClose,
            N::BeginFrame => Command::BeginFrame,
            N::EndFrame => Command::EndFrame,
            N::DrawRect => {
                let a = Args::new(name, args, 5)?;
                let (x, y, width, height) = (a.int(0)?, a.int(1)?, a.int(2)?, a.int(3)?);
                Command::DrawRect {
                    x,
                    y,
                    width,
                    height,
                    color: a.color(4)?,
                }
            }
            N::DrawText => {
                let a = Args::new(name, args, 5)?;
                let text = a.text(0)?;
                let (x, y, font_size) = (a.int(1)?, a.int(2)?, a.int(3)?);
                Command::DrawText {
                    text,
                    x,
                    y,
                    font_size,
                    color: a.color(4)?,
                }
            }
            N::LoadTexture => {
                let a = Args::new(name, args, 1)?;
                let path = a.text(0)?;
                max_outputs(name, nlhs, 1)?;
                Command::LoadTexture { path }
            }
            N::UnloadTexture => {
                let a = Args::new(name, args, 1)?;
                Command::UnloadTexture {
                    texture: a.texture(0)?,
                }
            }
            N::DrawLine => {
                let a = Args::new(name, args, 5)?;
                let (x1, y1) = (a.numeric_int(0)?, a.numeric_int(1)?);
                let (x2, y2) = (a.numeric_int(2)?, a.numeric_int(3)?);
                Command::DrawLine {
                    x1,
                    y1,
                    x2,
                    y2,
                    color: a.color(4)?,
                }
            }
            N::GetScreenSize => {
                Args::new(name, args, 0)?;
                max_outputs(name, nlhs, 1)?;
                Command::GetScreenSize
            }
            N::GetInputState => {
                Args::new(name, args, 0)?;
                max_outputs(name, nlhs, 1)?;
                Command::GetInputState
            }
            N::DrawWallSlice => {
                let a = Args::new(name, args, 4)?;
                let (x, start_y, end_y) = (a.numeric_int(0)?, a.numeric_int(1)?, a.numeric_int(2)?);
                Command::DrawWallSlice {
                    x,
                    start_y,
                    end_y,
                    color: a.color(3)?,
                }
            }
            N::DrawTexturedWallSlice => {
                let a = Args::new(name, args, 7)?;
                let (x, start_y, end_y) = (a.numeric_int(0)?, a.numeric_int(1)?, a.numeric_int(2)?);
                let width = a.numeric(3)? as f32;
                let texture = a.texture(4)?;
                let tex_u = a.numeric(5)? as f32;
                Command::DrawTexturedWallSlice {
                    x,
                    start_y,
                    end_y,
                    width,
                    texture,
                    tex_u,
                    tint: a.color(6)?,
                }
            }
            N::DrawSprite => {
                let a = Args::new(name, args, 6)?;
                let texture = a.texture(0)?;
                let (source, dest) = (a.rect(1)?, a.rect(2)?);
                let origin = a.vec2(3)?;
                let rotation = a.numeric(4)? as f32;
                Command::DrawSprite {
                    texture,
                    source,
                    dest,
                    origin,
                    rotation,
                    tint: a.color(5)?,
                }
            }
        };

        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: f64) -> Value {
        Value::scalar(v)
    }

    #[test]
    fn names_round_trip_through_strings() {
        for name in CommandName::ALL {
            assert_eq!(name.as_str().parse::<CommandName>(), Ok(name));
        }
        assert_eq!(
            "DrawRect".parse::<CommandName>(),
            Err(HostError::UnknownCommand("DrawRect".into()))
        );
    }

    #[test]
    fn scalars_truncate_toward_zero() {
        let cmd = Command::parse(
            CommandName::DrawRect,
            0,
            &[s(1.9), s(-2.7), s(10.0), s(5.5), Value::rgba(1, 2, 3, 4)],
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::DrawRect {
                x: 1,
                y: -2,
                width: 10,
                height: 5,
                color: Color::rgba(1, 2, 3, 4),
            }
        );
    }

    #[test]
    fn shape_errors_win_over_color_errors() {
        let bad_color = Value::row(vec![255.0, 0.0, 0.0, 255.0]);
        assert_eq!(
            Command::parse(CommandName::DrawRect, 0, &[s(0.0), s(0.0), s(1.0), s(1.0), bad_color.clone()]),
            Err(HostError::InvalidColor)
        );
        assert_eq!(
            Command::parse(CommandName::DrawRect, 0, &[s(0.0), Value::text("y"), s(1.0), s(1.0), bad_color]),
            Err(HostError::Args(CommandName::DrawRect))
        );
    }

    #[test]
    fn draw_line_requires_numeric_coordinates() {
        let args = [Value::Logical(true), s(0.0), s(1.0), s(1.0), Value::rgba(0, 0, 0, 255)];
        assert_eq!(
            Command::parse(CommandName::DrawLine, 0, &args),
            Err(HostError::Args(CommandName::DrawLine))
        );
    }

    #[test]
    fn load_texture_limits_outputs() {
        let args = [Value::text("wall.png")];
        assert!(Command::parse(CommandName::LoadTexture, 1, &args).is_ok());
        assert_eq!(
            Command::parse(CommandName::LoadTexture, 2, &args),
            Err(HostError::Outputs(CommandName::LoadTexture))
        );
        assert_eq!(
            Command::parse(CommandName::LoadTexture, 1, &[s(3.0)]),
            Err(HostError::Args(CommandName::LoadTexture))
        );
    }

    #[test]
    fn sprite_arguments_are_vectors() {
        let cmd = Command::parse(
            CommandName::DrawSprite,
            0,
            &[
                s(2.0),
                Value::row(vec![0.0, 0.0, -16.0, 16.0]),
                Value::row(vec![100.0, 50.0, 32.0, 32.0]),
                Value::row(vec![16.0, 16.0]),
                s(90.0),
                Value::rgba(255, 255, 255, 255),
            ],
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::DrawSprite {
                texture: TextureId(2),
                source: Rect::new(0.0, 0.0, -16.0, 16.0),
                dest: Rect::new(100.0, 50.0, 32.0, 32.0),
                origin: Vec2::new(16.0, 16.0),
                rotation: 90.0,
                tint: Color::WHITE,
            }
        );
    }

    #[test]
    fn negative_handles_saturate_to_invalid() {
        assert_eq!(
            Command::parse(CommandName::UnloadTexture, 0, &[s(-4.0)]),
            Ok(Command::UnloadTexture { texture: TextureId::INVALID })
        );
    }
}
