use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::backend::{Backend, Frame};
use crate::coords::Viewport;
use crate::device::{Gpu, GpuInit, GpuTexture, SurfaceErrorAction};
use crate::input::platform::winit::translate_window_event;
use crate::input::InputState;
use crate::render::{
    tessellate, GlyphAtlas, QuadBatches, QuadRenderer, QuadTexture, RenderCtx, RenderTarget,
};
use crate::renderer::RendererConfig;
use crate::texture::TextureSize;

/// Pumps allowed while waiting for the platform to hand us a window.
const INIT_PUMP_ATTEMPTS: u32 = 200;
const INIT_PUMP_TIMEOUT: Duration = Duration::from_millis(5);

/// Event loop kept between renderer lifetimes.
struct ParkedLoop {
    event_loop: EventLoop<()>,
    /// `resumed` is delivered once per loop, so a reused loop never sees it again.
    resumed: bool,
}

thread_local! {
    // winit allows a single event loop per process; it is parked here between
    // renderer lifetimes so shutdown + init works.
    static PARKED_EVENT_LOOP: RefCell<Option<ParkedLoop>> = const { RefCell::new(None) };
}

fn acquire_event_loop() -> Result<ParkedLoop> {
    if let Some(parked) = PARKED_EVENT_LOOP.with(|slot| slot.borrow_mut().take()) {
        return Ok(parked);
    }
    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    Ok(ParkedLoop {
        event_loop,
        resumed: false,
    })
}

fn park_event_loop(parked: ParkedLoop) {
    PARKED_EVENT_LOOP.with(|slot| *slot.borrow_mut() = Some(parked));
}

/// Decides when the handler may open its window.
///
/// Windows can only be created once the loop has been resumed. A loop taken
/// from the parking slot was resumed by an earlier renderer, so creation
/// happens on the next event-loop callback instead of in `resumed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CreationGate {
    loop_resumed: bool,
    closed: bool,
}

impl CreationGate {
    fn for_loop(parked: &ParkedLoop) -> Self {
        Self {
            loop_resumed: parked.resumed,
            closed: false,
        }
    }

    fn should_create(self, has_window: bool, failed: bool) -> bool {
        self.loop_resumed && !self.closed && !has_window && !failed
    }
}

/// Texture uploaded to the GPU plus its quad-pipeline bind group.
pub struct WindowTexture {
    texture: GpuTexture,
    bind_group: wgpu::BindGroup,
}

impl TextureSize for WindowTexture {
    fn size(&self) -> (u32, u32) {
        self.texture.size()
    }
}

/// Backend driving a winit window and a wgpu surface.
///
/// The caller owns the loop: events are pumped with a zero timeout from
/// [`Backend::poll_events`] instead of handing control to `run_app`.
pub struct WindowBackend {
    state: WindowState,
    event_loop: Option<EventLoop<()>>,
}

impl WindowBackend {
    /// Opens the window and creates the GPU context.
    pub fn new(config: &RendererConfig) -> Result<Self> {
        let parked = acquire_event_loop()?;
        let mut state = WindowState::new(config);
        state.gate = CreationGate::for_loop(&parked);

        let mut backend = Self {
            state,
            event_loop: Some(parked.event_loop),
        };

        for _ in 0..INIT_PUMP_ATTEMPTS {
            let status = backend.pump(INIT_PUMP_TIMEOUT);

            if let Some(err) = backend.state.init_error.take() {
                return Err(err);
            }
            if backend.state.entry.is_some() {
                break;
            }
            if let PumpStatus::Exit(code) = status {
                anyhow::bail!("event loop exited during window creation (code {code})");
            }
        }

        let Some(entry) = backend.state.entry.as_ref() else {
            anyhow::bail!("platform did not provide a window");
        };

        let info = entry.borrow_gpu().adapter_info();
        log::info!("window created; adapter: {} ({:?})", info.name, info.backend);

        Ok(backend)
    }

    pub fn window(&self) -> Option<&Window> {
        self.state.entry.as_ref().map(|e| e.borrow_window())
    }

    fn pump(&mut self, timeout: Duration) -> PumpStatus {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return PumpStatus::Exit(0);
        };
        event_loop.pump_app_events(Some(timeout), &mut self.state)
    }

    fn close_window(&mut self) {
        self.state.gate.closed = true;
        self.state.resources = None;
        if self.state.entry.take().is_some() {
            // Let the platform process the destroy before the loop is parked.
            self.pump(Duration::ZERO);
            log::info!("window closed");
        }
    }
}

impl Drop for WindowBackend {
    fn drop(&mut self) {
        self.close_window();
        if let Some(event_loop) = self.event_loop.take() {
            park_event_loop(ParkedLoop {
                event_loop,
                resumed: self.state.gate.loop_resumed,
            });
        }
    }
}

impl Backend for WindowBackend {
    type Texture = WindowTexture;

    fn poll_events(&mut self) {
        if let PumpStatus::Exit(_) = self.pump(Duration::ZERO) {
            self.state.close_requested = true;
        }
    }

    fn close_requested(&self) -> bool {
        self.state.close_requested
    }

    fn request_close(&mut self) {
        self.state.close_requested = true;
    }

    fn load_texture(&mut self, path: &Path) -> Result<WindowTexture> {
        let (Some(entry), Some(res)) = (self.state.entry.as_ref(), self.state.resources.as_ref())
        else {
            anyhow::bail!("window is closed");
        };

        let gpu = entry.borrow_gpu();
        let texture = GpuTexture::from_path(gpu.device(), gpu.queue(), path)?;
        let bind_group = res.quad.bind_texture(gpu.device(), &texture);

        Ok(WindowTexture {
            texture,
            bind_group,
        })
    }

    fn submit(&mut self, frame: Frame<'_, WindowTexture>) {
        let state = &mut self.state;
        let (Some(entry), Some(res)) = (state.entry.as_mut(), state.resources.as_mut()) else {
            return;
        };
        let batches = &mut state.batches;
        let mut fatal = false;

        entry.with_mut(|fields| {
            let size = fields.window.inner_size();
            if size.width == 0 || size.height == 0 {
                // Minimized.
                return;
            }

            let mut gpu_frame = match fields.gpu.begin_frame() {
                Ok(f) => f,
                Err(err) => {
                    let message = err.to_string();
                    match fields.gpu.handle_surface_error(err) {
                        SurfaceErrorAction::Fatal => {
                            log::error!("fatal surface error: {message}");
                            fatal = true;
                        }
                        action => log::debug!("surface error ({message}): {action:?}"),
                    }
                    return;
                }
            };

            let logical = size.to_logical::<f32>(fields.window.scale_factor());
            let gpu = &*fields.gpu;
            let ctx = RenderCtx::new(
                gpu.device(),
                gpu.queue(),
                gpu.surface_format(),
                Viewport::new(logical.width, logical.height),
            );

            let atlas = &mut res.atlas;
            tessellate(
                frame.commands,
                |id| frame.textures.get(id).map(TextureSize::size),
                frame.glyphs,
                |key| atlas.glyph_uv(ctx.queue, frame.glyphs, key),
                batches,
            );

            {
                let mut target = RenderTarget::new(&mut gpu_frame.encoder, &gpu_frame.view);
                let atlas = &res.atlas;
                res.quad.render(&ctx, &mut target, frame.clear, batches, |texture| match texture {
                    QuadTexture::Glyphs => Some(atlas.bind_group()),
                    QuadTexture::Image(id) => frame.textures.get(id).map(|t| &t.bind_group),
                    QuadTexture::White => None,
                });
            }

            gpu.submit(gpu_frame);
        });

        if fatal {
            state.close_requested = true;
        }
    }

    fn input(&self) -> &InputState {
        &self.state.input
    }

    fn shutdown(&mut self) {
        self.close_window();
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// GPU objects created once the device exists.
struct GpuResources {
    quad: QuadRenderer,
    atlas: GlyphAtlas,
}

impl GpuResources {
    fn new(device: &wgpu::Device) -> Self {
        let quad = QuadRenderer::new(device);
        let atlas = GlyphAtlas::new(device, &quad);
        Self { quad, atlas }
    }
}

struct WindowState {
    title: String,
    size: LogicalSize<f64>,
    resizable: bool,
    gpu_init: GpuInit,

    // Dropped before `entry`.
    resources: Option<GpuResources>,
    entry: Option<WindowEntry>,

    input: InputState,
    batches: QuadBatches,
    close_requested: bool,
    init_error: Option<anyhow::Error>,
    gate: CreationGate,
}

impl WindowState {
    fn new(config: &RendererConfig) -> Self {
        Self {
            title: config.title.clone(),
            size: LogicalSize::new(f64::from(config.width), f64::from(config.height)),
            resizable: config.resizable,
            gpu_init: config.gpu.clone(),
            resources: None,
            entry: None,
            input: InputState::default(),
            batches: QuadBatches::new(),
            close_requested: false,
            init_error: None,
            gate: CreationGate::default(),
        }
    }

    /// Opens the window if the gate allows it. Failures are kept in
    /// `init_error` for [`WindowBackend::new`] to report.
    fn ensure_window(&mut self, event_loop: &ActiveEventLoop) {
        if !self
            .gate
            .should_create(self.entry.is_some(), self.init_error.is_some())
        {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Poll);
        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("failed to create window: {e:#}");
            self.init_error = Some(e);
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(self.size)
            .with_resizable(self.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        self.resources = Some(GpuResources::new(entry.borrow_gpu().device()));
        self.entry = Some(entry);
        Ok(())
    }
}

impl ApplicationHandler for WindowState {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, _cause: StartCause) {
        self.ensure_window(event_loop);
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.gate.loop_resumed = true;
        self.ensure_window(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.ensure_window(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        if let Some(ev) = translate_window_event(entry.borrow_window(), &event) {
            self.input.apply_event(&ev);
        }

        match event {
            WindowEvent::CloseRequested => {
                log::debug!("window close requested");
                self.close_requested = true;
            }

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.borrow_window().inner_size();
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CreationGate;

    #[test]
    fn fresh_loop_waits_for_resume() {
        let gate = CreationGate::default();
        assert!(!gate.should_create(false, false));

        let resumed = CreationGate {
            loop_resumed: true,
            ..gate
        };
        assert!(resumed.should_create(false, false));
    }

    #[test]
    fn reused_loop_creates_without_a_second_resume() {
        // State a second `WindowBackend::new` starts from after the first
        // backend parked an already resumed loop.
        let gate = CreationGate {
            loop_resumed: true,
            closed: false,
        };
        assert!(gate.should_create(false, false));
    }

    #[test]
    fn no_creation_once_open_failed_or_closed() {
        let gate = CreationGate {
            loop_resumed: true,
            closed: false,
        };
        assert!(!gate.should_create(true, false));
        assert!(!gate.should_create(false, true));

        let closed = CreationGate {
            closed: true,
            ..gate
        };
        assert!(!closed.should_create(false, false));
    }
}
