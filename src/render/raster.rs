use image::RgbaImage;
use resvg::tiny_skia::{IntSize, Pixmap};

use crate::foundation::error::{PosterError, PosterResult};

/// Allocate a transparent pixmap.
pub(crate) fn new_pixmap(width: u32, height: u32) -> PosterResult<Pixmap> {
    Pixmap::new(width, height).ok_or_else(|| {
        PosterError::image_processing(format!("failed to allocate {width}x{height} pixmap"))
    })
}

/// Straight-alpha RGBA image → premultiplied pixmap.
pub(crate) fn pixmap_from_rgba(img: &RgbaImage) -> PosterResult<Pixmap> {
    let (w, h) = img.dimensions();
    let size = IntSize::from_wh(w, h)
        .ok_or_else(|| PosterError::invalid_input(format!("invalid raster size {w}x{h}")))?;
    let mut data = img.as_raw().clone();
    premultiply_rgba8_in_place(&mut data);
    Pixmap::from_vec(data, size)
        .ok_or_else(|| PosterError::image_processing("pixmap buffer size mismatch"))
}

/// Premultiplied pixmap → straight-alpha RGBA image.
pub(crate) fn pixmap_to_rgba(pixmap: &Pixmap) -> PosterResult<RgbaImage> {
    let mut data = pixmap.data().to_vec();
    demultiply_rgba8_in_place(&mut data);
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .ok_or_else(|| PosterError::image_processing("rgba buffer size mismatch"))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 || a == 0 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
