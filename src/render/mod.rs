//! CPU raster stages of a poster: background, photo layers, text, encoding.

pub mod blur;
pub mod canvas;
pub mod encode;
pub mod photo;
pub(crate) mod raster;
pub(crate) mod svg_raster;
pub mod text;
