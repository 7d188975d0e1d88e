//! Separable gaussian blur over premultiplied RGBA8, in Q16 fixed point.

use resvg::tiny_skia::Pixmap;

use crate::foundation::error::{PosterError, PosterResult};

const ONE_Q16: u32 = 1 << 16;

/// Kernel radius used for a given standard deviation.
pub fn blur_radius(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (sigma * 2.0).ceil() as u32
}

/// Blur `pixmap` in place. A non-positive `sigma` is a no-op.
pub fn blur_pixmap(pixmap: &mut Pixmap, sigma: f32) -> PosterResult<()> {
    let radius = blur_radius(sigma);
    if radius == 0 {
        return Ok(());
    }
    let (w, h) = (pixmap.width() as usize, pixmap.height() as usize);
    let len = w
        .checked_mul(h)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| PosterError::image_processing("blur buffer size overflow"))?;
    if pixmap.data().len() != len {
        return Err(PosterError::image_processing(
            "blur expects a tightly packed RGBA8 buffer",
        ));
    }

    let taps = kernel_q16(radius, sigma)?;
    let mut scratch = vec![0u8; len];
    let rows = Lines {
        count: h,
        len: w,
        line_stride: w * 4,
        step: 4,
    };
    let columns = Lines {
        count: w,
        len: h,
        line_stride: 4,
        step: w * 4,
    };
    convolve(pixmap.data(), &mut scratch, rows, &taps);
    convolve(&scratch, pixmap.data_mut(), columns, &taps);
    Ok(())
}

/// Normalized gaussian taps for `-radius..=radius`, summing to exactly `1 << 16`.
fn kernel_q16(radius: u32, sigma: f32) -> PosterResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(PosterError::invalid_input(
            "blur sigma must be finite and > 0",
        ));
    }
    let r = radius as usize;
    let two_var = 2.0 * f64::from(sigma).powi(2);
    let falloff: Vec<f64> = (0..=r)
        .map(|d| (-((d * d) as f64) / two_var).exp())
        .collect();
    let total = falloff[0] + 2.0 * falloff[1..].iter().sum::<f64>();
    if total <= 0.0 {
        return Err(PosterError::image_processing("gaussian kernel sum is zero"));
    }

    let mut taps: Vec<u32> = (0..=2 * r)
        .map(|i| (falloff[i.abs_diff(r)] / total * f64::from(ONE_Q16)).round() as u32)
        .collect();
    let sum: i64 = taps.iter().map(|&t| i64::from(t)).sum();
    // Center tap absorbs the rounding drift.
    taps[r] = (i64::from(taps[r]) + i64::from(ONE_Q16) - sum).clamp(0, i64::from(ONE_Q16)) as u32;
    Ok(taps)
}

/// A family of parallel pixel lines inside one RGBA8 buffer, addressed in bytes.
#[derive(Clone, Copy)]
struct Lines {
    count: usize,
    len: usize,
    line_stride: usize,
    step: usize,
}

/// 1-D convolution along each line; samples past either end clamp to the edge pixel.
fn convolve(src: &[u8], dst: &mut [u8], lines: Lines, taps: &[u32]) {
    let r = taps.len() / 2;
    let last = lines.len.saturating_sub(1);
    for line in 0..lines.count {
        let base = line * lines.line_stride;
        for i in 0..lines.len {
            let mut acc = [0u64; 4];
            for (t, &weight) in taps.iter().enumerate() {
                let j = (i + t).saturating_sub(r).min(last);
                let px = base + j * lines.step;
                for (a, &v) in acc.iter_mut().zip(&src[px..px + 4]) {
                    *a += u64::from(weight) * u64::from(v);
                }
            }
            let out = base + i * lines.step;
            for (d, a) in dst[out..out + 4].iter_mut().zip(acc) {
                *d = ((a + 0x8000) >> 16).min(255) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
