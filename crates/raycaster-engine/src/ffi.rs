//! C ABI.
//!
//! Functions prefixed `raycaster_` over an opaque renderer pointer returned
//! by [`raycaster_init`]. Every function accepts a null renderer and then does
//! nothing (or returns a neutral value). [`raycaster_shutdown`] consumes the
//! pointer.
#![allow(clippy::missing_safety_doc)]

use std::borrow::Cow;
use std::ffi::{c_char, CStr};

use crate::coords::{Rect, Vec2};
use crate::input::InputSnapshot;
use crate::logging::{init_logging, LoggingConfig};
use crate::paint::Color;
use crate::renderer::{Renderer, RendererConfig};
use crate::texture::TextureId;

/// Opaque renderer handle for C callers.
pub type RaycasterRenderer = Renderer;

unsafe fn c_str<'a>(ptr: *const c_char) -> Option<Cow<'a, str>> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy())
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Opens a window. Returns null on failure (logged).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_init(
    width: i32,
    height: i32,
    title: *const c_char,
) -> *mut RaycasterRenderer {
    init_logging(LoggingConfig::default());

    let title = unsafe { c_str(title) }.map_or_else(|| "raycaster".to_string(), Cow::into_owned);
    let (Ok(width), Ok(height)) = (u32::try_from(width), u32::try_from(height)) else {
        log::error!("raycaster_init: invalid window size {width}x{height}");
        return std::ptr::null_mut();
    };

    match Renderer::init(RendererConfig::new(width, height, title)) {
        Ok(renderer) => Box::into_raw(Box::new(renderer)),
        Err(e) => {
            log::error!("raycaster_init failed: {e:#}");
            std::ptr::null_mut()
        }
    }
}

/// Releases all textures, closes the window and frees the renderer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_shutdown(renderer: *mut RaycasterRenderer) {
    if renderer.is_null() {
        return;
    }
    let renderer = unsafe { Box::from_raw(renderer) };
    renderer.shutdown();
}

/// `true` for a null renderer so caller loops terminate.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_should_close(renderer: *const RaycasterRenderer) -> bool {
    unsafe { renderer.as_ref() }.is_none_or(Renderer::should_close)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_begin_frame(renderer: *mut RaycasterRenderer) {
    if let Some(r) = unsafe { renderer.as_mut() } {
        r.begin_frame();
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_end_frame(renderer: *mut RaycasterRenderer) {
    if let Some(r) = unsafe { renderer.as_mut() } {
        r.end_frame();
    }
}

// ============================================================================
// Textures
// ============================================================================

/// Returns 0 on failure.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_load_texture(
    renderer: *mut RaycasterRenderer,
    path: *const c_char,
) -> u32 {
    let (Some(r), Some(path)) = (unsafe { renderer.as_mut() }, unsafe { c_str(path) }) else {
        return TextureId::INVALID.0;
    };
    r.load_texture(&*path).0
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_unload_texture(renderer: *mut RaycasterRenderer, texture: u32) {
    if let Some(r) = unsafe { renderer.as_mut() } {
        r.unload_texture(TextureId(texture));
    }
}

// ============================================================================
// Drawing
// ============================================================================

#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_draw_wall_slice(
    renderer: *mut RaycasterRenderer,
    x: i32,
    start_y: i32,
    end_y: i32,
    color: Color,
) {
    if let Some(r) = unsafe { renderer.as_mut() } {
        r.draw_wall_slice(x, start_y, end_y, color);
    }
}

#[allow(clippy::too_many_arguments)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_draw_textured_wall_slice(
    renderer: *mut RaycasterRenderer,
    x: i32,
    start_y: i32,
    end_y: i32,
    width: f32,
    texture: u32,
    tex_u: f32,
    tint: Color,
) {
    if let Some(r) = unsafe { renderer.as_mut() } {
        r.draw_textured_wall_slice(x, start_y, end_y, width, TextureId(texture), tex_u, tint);
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_draw_sprite(
    renderer: *mut RaycasterRenderer,
    texture: u32,
    source: Rect,
    dest: Rect,
    origin: Vec2,
    rotation: f32,
    tint: Color,
) {
    if let Some(r) = unsafe { renderer.as_mut() } {
        r.draw_sprite(TextureId(texture), source, dest, origin, rotation, tint);
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_draw_rect(
    renderer: *mut RaycasterRenderer,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    color: Color,
) {
    if let Some(r) = unsafe { renderer.as_mut() } {
        r.draw_rect(x, y, width, height, color);
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_draw_line(
    renderer: *mut RaycasterRenderer,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    color: Color,
) {
    if let Some(r) = unsafe { renderer.as_mut() } {
        r.draw_line(x1, y1, x2, y2, color);
    }
}

/// `text` is NUL-terminated UTF-8; invalid sequences are replaced.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_draw_text(
    renderer: *mut RaycasterRenderer,
    text: *const c_char,
    x: i32,
    y: i32,
    font_size: i32,
    color: Color,
) {
    let (Some(r), Some(text)) = (unsafe { renderer.as_mut() }, unsafe { c_str(text) }) else {
        return;
    };
    r.draw_text(&text, x, y, font_size, color);
}

// ============================================================================
// Queries
// ============================================================================

#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_screen_width(renderer: *const RaycasterRenderer) -> i32 {
    unsafe { renderer.as_ref() }.map_or(0, Renderer::screen_width)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_screen_height(renderer: *const RaycasterRenderer) -> i32 {
    unsafe { renderer.as_ref() }.map_or(0, Renderer::screen_height)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_input_snapshot(
    renderer: *const RaycasterRenderer,
) -> InputSnapshot {
    unsafe { renderer.as_ref() }.map_or_else(InputSnapshot::default, Renderer::input_snapshot)
}

/// Seconds; 0 for a null renderer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn raycaster_frame_time(renderer: *const RaycasterRenderer) -> f32 {
    unsafe { renderer.as_ref() }.map_or(0.0, Renderer::frame_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_renderer_is_tolerated() {
        let null = std::ptr::null_mut::<RaycasterRenderer>();
        unsafe {
            assert!(raycaster_should_close(null));
            raycaster_begin_frame(null);
            raycaster_draw_rect(null, 0, 0, 10, 10, Color::RED);
            raycaster_end_frame(null);
            assert_eq!(raycaster_load_texture(null, c"x.png".as_ptr()), 0);
            raycaster_unload_texture(null, 1);
            assert_eq!(raycaster_screen_width(null), 0);
            assert_eq!(raycaster_input_snapshot(null), InputSnapshot::default());
            raycaster_shutdown(null);
        }
    }

    #[test]
    fn null_string_is_none() {
        assert!(unsafe { c_str(std::ptr::null()) }.is_none());
        assert_eq!(unsafe { c_str(c"abc".as_ptr()) }.as_deref(), Some("abc"));
    }
}
