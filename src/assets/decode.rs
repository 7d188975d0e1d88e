//! Encoded image bytes to pixels.

use image::{DynamicImage, ImageFormat};

use crate::foundation::error::{PosterError, PosterResult};

/// A decoded image plus what is known about its encoding.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    /// Decoded pixels.
    pub image: DynamicImage,
    /// Detected container format, when recognizable from the bytes.
    pub format: Option<ImageFormat>,
    /// Size of the encoded input.
    pub byte_len: usize,
}

impl LoadedImage {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Intrinsic properties of an image source.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ImageMetadata {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Lowercase format name (`png`, `jpeg`, `webp`, …).
    pub format: String,
}

/// Decode encoded image bytes. Undecodable input is caller error, not an engine failure.
pub fn decode_image(bytes: &[u8]) -> PosterResult<LoadedImage> {
    if bytes.is_empty() {
        return Err(PosterError::invalid_input("image data is empty"));
    }
    let image = image::load_from_memory(bytes)
        .map_err(|e| PosterError::invalid_input(format!("decode image: {e}")))?;
    Ok(LoadedImage {
        image,
        format: image::guess_format(bytes).ok(),
        byte_len: bytes.len(),
    })
}

/// Lowercase name for an image format.
pub fn format_name(format: ImageFormat) -> String {
    format!("{format:?}").to_ascii_lowercase()
}
