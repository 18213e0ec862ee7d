use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use raycaster_engine::backend::Backend;
use raycaster_engine::logging::{init_logging, LoggingConfig};
use raycaster_engine::{Color, Rect, Renderer, RendererConfig, TextureId, Vec2};

#[derive(Parser, Debug)]
#[command(name = "raycaster-tester")]
#[command(about = "Opens a window and exercises every drawing entry point")]
#[command(version)]
struct Args {
    /// Window width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Image drawn as a sprite and as textured wall slices
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Stop after this many frames instead of waiting for the window to close
    #[arg(long)]
    frames: Option<u64>,

    /// Log filter in env_logger syntax (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

/// Number of textured wall slices in the strip.
const STRIP_COLUMNS: i32 = 160;

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    log::info!("initializing renderer");
    let mut renderer = Renderer::init(RendererConfig::new(
        args.width,
        args.height,
        "Basic Renderer Test",
    ))?;

    let texture = args
        .texture
        .as_ref()
        .map(|path| renderer.load_texture(path))
        .unwrap_or(TextureId::INVALID);
    if args.texture.is_some() && texture == TextureId::INVALID {
        log::warn!("test texture failed to load; sprite and wall strip are skipped");
    }

    log::info!("entering render loop");
    let mut frame = 0u64;
    while !renderer.should_close() && args.frames.is_none_or(|max| frame < max) {
        renderer.begin_frame();
        draw_scene(&mut renderer, texture, frame);
        renderer.end_frame();
        frame += 1;
    }

    log::info!("window closed after {frame} frames, shutting down");
    if texture != TextureId::INVALID {
        renderer.unload_texture(texture);
    }
    renderer.shutdown();
    Ok(())
}

/// One frame of test content.
fn draw_scene<B: Backend>(r: &mut Renderer<B>, texture: TextureId, frame: u64) {
    let (w, h) = (r.screen_width(), r.screen_height());

    r.draw_text("Hello from Renderer!", 20, 20, 20, Color::GREEN);

    let (rect_w, rect_h) = (200, 100);
    r.draw_rect((w - rect_w) / 2, (h - rect_h) / 2, rect_w, rect_h, Color::BLUE);

    r.draw_line(0, h / 2, w, h / 2, Color::RED);

    let Some((tw, th)) = r.texture_size(texture) else {
        return;
    };
    let (tw, th) = (tw as f32, th as f32);

    let spin = (frame % 360) as f32;
    r.draw_sprite(
        texture,
        Rect::new(0.0, 0.0, tw, th),
        Rect::new(114.0, 114.0, 128.0, 128.0),
        Vec2::new(64.0, 64.0),
        spin,
        Color::WHITE,
    );

    // A wall that shrinks towards the right edge.
    let left = w - STRIP_COLUMNS - 20;
    for col in 0..STRIP_COLUMNS {
        let half = 120 - col / 2;
        let tex_u = col as f32 / STRIP_COLUMNS as f32;
        let shade = 255 - (col / 2) as u8;
        r.draw_textured_wall_slice(
            left + col,
            h / 2 - half,
            h / 2 + half,
            1.0,
            texture,
            tex_u,
            Color::rgb(shade, shade, shade),
        );
    }
}
