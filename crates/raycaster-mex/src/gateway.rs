use raycaster_engine::backend::Backend;
use raycaster_engine::logging::{init_logging, LoggingConfig};
use raycaster_engine::window::WindowBackend;
use raycaster_engine::{HeadlessBackend, InputSnapshot, Renderer, RendererConfig};

use crate::command::{Command, CommandName};
use crate::error::HostError;
use crate::value::Value;

/// Window title used by `init`.
pub const WINDOW_TITLE: &str = "MATLAB Renderer";

/// Field names of the `getInputState` struct, in order.
pub const INPUT_FIELDS: [&str; 12] = [
    "MoveForward",
    "MoveBackward",
    "RotateLeft",
    "RotateRight",
    "StrafeLeft",
    "StrafeRight",
    "Exit",
    "MouseX",
    "MouseY",
    "MouseLeft",
    "MouseRight",
    "MouseMiddle",
];

type Factory<B> = Box<dyn FnMut(RendererConfig) -> anyhow::Result<Renderer<B>>>;

/// Command gateway holding at most one renderer.
///
/// `init` creates the renderer through the gateway's factory, `shutdown`
/// drops it; every other command needs a live renderer.
pub struct Gateway<B: Backend = WindowBackend> {
    renderer: Option<Renderer<B>>,
    factory: Factory<B>,
}

impl Gateway<WindowBackend> {
    pub fn new() -> Self {
        Self::with_factory(Renderer::init)
    }
}

impl Default for Gateway<WindowBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl Gateway<HeadlessBackend> {
    pub fn headless() -> Self {
        Self::with_factory(Renderer::headless)
    }
}

impl<B: Backend> Gateway<B> {
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: FnMut(RendererConfig) -> anyhow::Result<Renderer<B>> + 'static,
    {
        Self {
            renderer: None,
            factory: Box::new(factory),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.renderer.is_some()
    }

    pub fn renderer(&self) -> Option<&Renderer<B>> {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> Option<&mut Renderer<B>> {
        self.renderer.as_mut()
    }

    /// Entry point: `args[0]` is the command string, `nlhs` the number of
    /// outputs the caller asked for. Returns the produced outputs.
    pub fn call(&mut self, nlhs: usize, args: &[Value]) -> Result<Vec<Value>, HostError> {
        let (name, rest) = match args.split_first() {
            Some((Value::Char(name), rest)) => (name.as_str(), rest),
            _ => return Err(HostError::InvalidInput),
        };

        let name: CommandName = name.parse()?;
        let command = Command::parse(name, nlhs, rest)?;
        log::trace!("gateway: {name}");
        self.execute(nlhs, command)
    }

    fn execute(&mut self, nlhs: usize, command: Command) -> Result<Vec<Value>, HostError> {
        let wants_output = nlhs > 0;

        match command {
            Command::Init { width, height } => self.init(width, height, wants_output),
            Command::Shutdown => {
                match self.renderer.take() {
                    Some(renderer) => renderer.shutdown(),
                    None => log::info!("shutdown called without an initialized renderer"),
                }
                Ok(Vec::new())
            }
            command => {
                let renderer = self.renderer.as_mut().ok_or(HostError::NotInitialized)?;
                Ok(dispatch(renderer, wants_output, command))
            }
        }
    }

    fn init(&mut self, width: i32, height: i32, wants_output: bool) -> Result<Vec<Value>, HostError> {
        init_logging(LoggingConfig::default());

        if self.renderer.is_some() {
            return Err(HostError::AlreadyInitialized);
        }

        let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
            return Err(HostError::Init(format!("invalid window size {width}x{height}")));
        };

        let renderer = (self.factory)(RendererConfig::new(w, h, WINDOW_TITLE))
            .map_err(|e| HostError::Init(format!("{e:#}")))?;
        self.renderer = Some(renderer);

        Ok(if wants_output { vec![Value::Logical(true)] } else { Vec::new() })
    }
}

impl<B: Backend> Drop for Gateway<B> {
    fn drop(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            renderer.shutdown();
        }
    }
}

fn dispatch<B: Backend>(r: &mut Renderer<B>, wants_output: bool, command: Command) -> Vec<Value> {
    let output = match command {
        Command::Init { .. } | Command::Shutdown => None,
        Command::ShouldClose => Some(Value::Logical(r.should_close())),
        Command::BeginFrame => {
            r.begin_frame();
            None
        }
        Command::EndFrame => {
            r.end_frame();
            None
        }
        Command::DrawRect { x, y, width, height, color } => {
            r.draw_rect(x, y, width, height, color);
            None
        }
        Command::DrawText { text, x, y, font_size, color } => {
            r.draw_text(&text, x, y, font_size, color);
            None
        }
        Command::LoadTexture { path } => Some(Value::scalar(f64::from(r.load_texture(&path).0))),
        Command::UnloadTexture { texture } => {
            r.unload_texture(texture);
            None
        }
        Command::DrawLine { x1, y1, x2, y2, color } => {
            r.draw_line(x1, y1, x2, y2, color);
            None
        }
        Command::GetScreenSize => Some(Value::row(vec![
            f64::from(r.screen_width()),
            f64::from(r.screen_height()),
        ])),
        // Always produced, even for zero requested outputs.
        Command::GetInputState => return vec![input_struct(&r.input_snapshot())],
        Command::DrawWallSlice { x, start_y, end_y, color } => {
            r.draw_wall_slice(x, start_y, end_y, color);
            None
        }
        Command::DrawTexturedWallSlice { x, start_y, end_y, width, texture, tex_u, tint } => {
            r.draw_textured_wall_slice(x, start_y, end_y, width, texture, tex_u, tint);
            None
        }
        Command::DrawSprite { texture, source, dest, origin, rotation, tint } => {
            r.draw_sprite(texture, source, dest, origin, rotation, tint);
            None
        }
    };

    output.filter(|_| wants_output).into_iter().collect()
}

/// Input snapshot as a struct with [`INPUT_FIELDS`] in order.
pub fn input_struct(s: &InputSnapshot) -> Value {
    let values: [Value; 12] = [
        s.move_forward.into(),
        s.move_backward.into(),
        s.rotate_left.into(),
        s.rotate_right.into(),
        s.strafe_left.into(),
        s.strafe_right.into(),
        s.exit.into(),
        f64::from(s.mouse_x).into(),
        f64::from(s.mouse_y).into(),
        s.mouse_left.into(),
        s.mouse_right.into(),
        s.mouse_middle.into(),
    ];

    Value::Struct(
        INPUT_FIELDS
            .iter()
            .map(|name| name.to_string())
            .zip(values)
            .collect(),
    )
}
