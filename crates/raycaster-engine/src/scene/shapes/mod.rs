//! Shape payloads + push helpers.

pub mod line;
pub mod rect;
pub mod text;
pub mod texture;
