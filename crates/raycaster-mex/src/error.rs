//! Caller-visible gateway errors.

use thiserror::Error;

use crate::command::CommandName;

/// Error raised back to the host as an identifier plus a message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HostError {
    /// Missing or non-char command argument.
    #[error("First argument must be a command string.")]
    InvalidInput,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Color must be a 1x4 uint8 array [R G B A].")]
    InvalidColor,

    /// Wrong argument count or argument class for a command.
    #[error("Usage: {}", .0.usage())]
    Args(CommandName),

    /// More outputs requested than the command produces.
    #[error("Too many output arguments for {}.", .0.as_str())]
    Outputs(CommandName),

    #[error("InitRenderer failed: {0}")]
    Init(String),

    #[error("Renderer is already initialized; call shutdown first.")]
    AlreadyInitialized,

    #[error("Renderer is not initialized; call init first.")]
    NotInitialized,
}

impl HostError {
    /// Host error identifier, `Component:Mnemonic[:Detail]`.
    pub fn id(&self) -> &'static str {
        match self {
            HostError::InvalidInput => "Renderer:InvalidInput",
            HostError::UnknownCommand(_) => "Renderer:UnknownCommand",
            HostError::InvalidColor => "Renderer:InvalidColor",
            HostError::Args(name) => name.args_error_id(),
            HostError::Outputs(name) => name.outputs_error_id(),
            HostError::Init(_) | HostError::AlreadyInitialized => "Renderer:Init",
            HostError::NotInitialized => "Renderer:NotInitialized",
        }
    }
}
