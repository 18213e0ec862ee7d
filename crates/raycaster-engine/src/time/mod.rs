//! Frame timing.
//!
//! - `FrameClock`: one per renderer, `tick()` once per presented frame
//! - `FramePacer`: optional sleep-based cap on the presentation rate

mod frame_clock;

pub use frame_clock::{FrameClock, FramePacer};
