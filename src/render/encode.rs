//! Final resize and PNG/JPEG encoding.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use resvg::tiny_skia::Pixmap;
use serde::{Deserialize, Serialize};

use crate::foundation::core::MAX_DIMENSION;
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::raster::pixmap_to_rgba;

/// JPEG quality used when none is requested.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encoded output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless PNG.
    #[default]
    Png,
    /// Baseline JPEG.
    #[serde(alias = "jpg")]
    Jpeg,
}

impl OutputFormat {
    /// Lowercase name reported in metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = PosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            other => Err(PosterError::invalid_input(format!(
                "unsupported output format \"{other}\""
            ))),
        }
    }
}

/// How a resize treats the aspect ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFit {
    /// Scale to fit inside the box, preserving aspect ratio.
    #[default]
    Contain,
    /// Scale to fill the box, preserving aspect ratio and cropping the overflow.
    Cover,
    /// Stretch to exactly the box.
    Fill,
}

/// Output resize request. A missing side is derived from the canvas aspect ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResizeOptions {
    /// Target width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Target height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Aspect handling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<ResizeFit>,
}

/// Output encoding options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OutputOptions {
    /// Container format.
    #[serde(default)]
    pub format: OutputFormat,
    /// JPEG quality, 1 to 100. Ignored for PNG.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    /// Optional final resize.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize: Option<ResizeOptions>,
}

impl OutputOptions {
    /// PNG at canvas size.
    pub fn png() -> Self {
        Self::default()
    }

    /// JPEG with the given quality.
    pub fn jpeg(quality: u8) -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: Some(quality),
            resize: None,
        }
    }

    /// Add a resize.
    pub fn with_resize(mut self, resize: ResizeOptions) -> Self {
        self.resize = Some(resize);
        self
    }

    /// Check quality and resize ranges.
    pub fn validate(&self) -> PosterResult<()> {
        if let Some(q) = self.quality
            && !(1..=100).contains(&q)
        {
            return Err(PosterError::invalid_input(format!(
                "quality must be in 1..=100, got {q}"
            )));
        }
        if let Some(r) = &self.resize {
            if r.width.is_none() && r.height.is_none() {
                return Err(PosterError::invalid_input(
                    "resize needs a width, a height, or both",
                ));
            }
            for (what, v) in [("width", r.width), ("height", r.height)] {
                if let Some(v) = v
                    && !(1..=MAX_DIMENSION).contains(&v)
                {
                    return Err(PosterError::invalid_input(format!(
                        "resize {what} must be in 1..={MAX_DIMENSION}, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Encoded image plus its final geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// File bytes.
    pub bytes: Vec<u8>,
    /// Final width.
    pub width: u32,
    /// Final height.
    pub height: u32,
    /// Container format.
    pub format: OutputFormat,
}

/// Resize (optionally) and encode the finished canvas.
pub fn encode_canvas(canvas: &Pixmap, opts: &OutputOptions) -> PosterResult<EncodedImage> {
    opts.validate()?;
    let mut img = DynamicImage::ImageRgba8(pixmap_to_rgba(canvas)?);
    if let Some(resize) = &opts.resize {
        img = apply_resize(img, resize);
    }
    let (width, height) = (img.width(), img.height());

    let mut out = Cursor::new(Vec::new());
    match opts.format {
        OutputFormat::Png => img
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| PosterError::image_processing(format!("png encode failed: {e}")))?,
        OutputFormat::Jpeg => {
            let quality = opts.quality.unwrap_or(DEFAULT_JPEG_QUALITY);
            JpegEncoder::new_with_quality(&mut out, quality)
                .encode_image(&img.to_rgb8())
                .map_err(|e| PosterError::image_processing(format!("jpeg encode failed: {e}")))?
        }
    }

    Ok(EncodedImage {
        bytes: out.into_inner(),
        width,
        height,
        format: opts.format,
    })
}

/// Target box for a resize; a missing side follows the source aspect ratio.
pub fn resize_target(src_width: u32, src_height: u32, resize: &ResizeOptions) -> (u32, u32) {
    let aspect = f64::from(src_width) / f64::from(src_height.max(1));
    let derive = |v: f64| (v.round() as u32).clamp(1, MAX_DIMENSION);
    match (resize.width, resize.height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, derive(f64::from(w) / aspect)),
        (None, Some(h)) => (derive(f64::from(h) * aspect), h),
        (None, None) => (src_width, src_height),
    }
}

fn apply_resize(img: DynamicImage, resize: &ResizeOptions) -> DynamicImage {
    let (w, h) = resize_target(img.width(), img.height(), resize);
    if (w, h) == (img.width(), img.height()) {
        return img;
    }
    match resize.fit.unwrap_or_default() {
        ResizeFit::Contain => img.resize(w, h, FilterType::Lanczos3),
        ResizeFit::Cover => img.resize_to_fill(w, h, FilterType::Lanczos3),
        ResizeFit::Fill => img.resize_exact(w, h, FilterType::Lanczos3),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
