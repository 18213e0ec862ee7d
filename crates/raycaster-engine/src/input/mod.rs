//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The window backend translates platform events into `InputEvent`s
//! (`platform::winit`) and folds them into an `InputState`.

pub(crate) mod platform;

mod snapshot;
mod state;
mod types;

pub use snapshot::{InputSnapshot, KeyBindings};
pub use state::InputState;
pub use types::{
    InputEvent,
    Key,
    KeyState,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
};
