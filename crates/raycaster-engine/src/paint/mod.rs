//! Paint model shared between the entry points and renderers.
//!
//! Colors are straight-alpha 8-bit RGBA, exactly as callers pass them.
//! Geometry types remain in `coords`.

pub mod color;

pub use color::Color;
