//! GPU device + surface management.
//!
//! - creates the wgpu Instance/Adapter/Device/Queue
//! - creates & configures the Surface (swapchain)
//! - acquires frames and provides encoders/views for rendering
//! - uploads decoded images as sampled textures

mod error;
mod frame;
mod gpu;
mod init;
mod surface;
mod texture;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use texture::{decode_image, GpuTexture};
