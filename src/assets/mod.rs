//! Colors, fonts, and image sources.

pub mod color;
pub mod decode;
pub mod fonts;
pub mod loader;
