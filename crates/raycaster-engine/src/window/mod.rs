//! Window backend.
//!
//! Owns the `winit` window and wires it to the GPU layer and the quad
//! renderer. Events are pumped from the caller's loop.

mod backend;

pub use backend::{WindowBackend, WindowTexture};
