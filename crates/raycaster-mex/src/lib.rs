//! Numeric-environment gateway for the raycaster engine.
//!
//! A host binding (for example a MEX shim) converts its native arrays into
//! [`Value`]s and forwards every call to one [`Gateway`]:
//!
//! ```text
//! renderer('init', 800, 600)
//! renderer('drawRect', 10, 10, 50, 50, uint8([255 0 0 255]))
//! s = renderer('getInputState')
//! ```
//!
//! Errors come back as [`HostError`]s carrying a host identifier
//! (`HostError::id`) and a message.

pub mod command;
pub mod error;
pub mod gateway;
pub mod value;

pub use command::{Command, CommandName};
pub use error::HostError;
pub use gateway::{input_struct, Gateway, INPUT_FIELDS, WINDOW_TITLE};
pub use value::{Matrix, Value};
