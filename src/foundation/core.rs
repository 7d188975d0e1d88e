//! Pixel geometry shared by layout and rendering.

use crate::foundation::error::{PosterError, PosterResult};

/// Largest accepted width or height, in pixels, for canvases, photo slots and output resizes.
pub const MAX_DIMENSION: u32 = 10_000;

/// Absolute canvas coordinate in whole pixels. May lie outside the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelPoint {
    /// Horizontal coordinate, growing rightwards.
    pub x: i64,
    /// Vertical coordinate, growing downwards.
    pub y: i64,
}

impl PixelPoint {
    /// Construct a point.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Validated raster dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// Create a size with both sides in `1..=MAX_DIMENSION`.
    pub fn new(width: u32, height: u32) -> PosterResult<Self> {
        check_dimension("width", width)?;
        check_dimension("height", height)?;
        Ok(Self { width, height })
    }

    /// Convert signed template dimensions, rejecting negatives and oversize values.
    pub fn from_signed(width: i64, height: i64) -> PosterResult<Self> {
        let w = u32::try_from(width)
            .map_err(|_| PosterError::invalid_input(format!("width {width} out of range")))?;
        let h = u32::try_from(height)
            .map_err(|_| PosterError::invalid_input(format!("height {height} out of range")))?;
        Self::new(w, h)
    }
}

fn check_dimension(what: &str, v: u32) -> PosterResult<()> {
    if v == 0 || v > MAX_DIMENSION {
        return Err(PosterError::invalid_input(format!(
            "{what} must be in 1..={MAX_DIMENSION}, got {v}"
        )));
    }
    Ok(())
}
