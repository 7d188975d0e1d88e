//! Strict color-string parsing.
//!
//! Two syntaxes are accepted: `#rrggbb` (exactly six hex digits) and `rgb(r,g,b)` /
//! `rgba(r,g,b[,a])`. Three-digit hex and named colors are rejected.

use crate::foundation::error::{PosterError, PosterResult};

/// Opaque RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

/// RGB triple with straight (non-premultiplied) alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
}

impl Rgba {
    /// Fully opaque color.
    pub fn opaque(rgb: Rgb) -> Self {
        Self {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
            alpha: 1.0,
        }
    }

    /// Alpha quantized to a byte.
    pub fn alpha_u8(self) -> u8 {
        (self.alpha.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// SVG paint pair: `#rrggbb` plus opacity.
    pub fn to_svg_paint(self) -> (String, f32) {
        (
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b),
            self.alpha.clamp(0.0, 1.0),
        )
    }

    /// Convert into a `tiny_skia` color.
    pub(crate) fn to_skia(self) -> resvg::tiny_skia::Color {
        resvg::tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.alpha_u8())
    }
}

/// `true` iff `s` is `#` followed by exactly six hex digits.
pub fn is_valid_hex_color(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('#') else {
        return false;
    };
    digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parse `#rrggbb` into its three channels.
pub fn hex_to_rgb(s: &str) -> PosterResult<Rgb> {
    if !is_valid_hex_color(s) {
        return Err(PosterError::invalid_input(format!(
            "invalid hex color \"{s}\" (expected #rrggbb)"
        )));
    }

    fn hex_byte(pair: &str) -> PosterResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| PosterError::invalid_input(format!("invalid hex byte \"{pair}\"")))
    }

    Ok(Rgb {
        r: hex_byte(&s[1..3])?,
        g: hex_byte(&s[3..5])?,
        b: hex_byte(&s[5..7])?,
    })
}

/// Parse `rgb(r,g,b)` or `rgba(r,g,b[,a])`. Returns `None` for anything else.
pub fn parse_rgba(s: &str) -> Option<Rgba> {
    let s = s.trim();
    let (inner, allow_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
        (rest.strip_suffix(')')?, true)
    } else if let Some(rest) = s.strip_prefix("rgb(") {
        (rest.strip_suffix(')')?, false)
    } else {
        return None;
    };

    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    let alpha = match (parts.len(), allow_alpha) {
        (3, _) => 1.0,
        (4, true) => {
            let a = parts[3].parse::<f32>().ok()?;
            if !a.is_finite() || !(0.0..=1.0).contains(&a) {
                return None;
            }
            a
        }
        _ => return None,
    };

    let channel = |p: &str| p.parse::<u8>().ok();
    Some(Rgba {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        alpha,
    })
}

/// Parse either accepted syntax, trying the functional form first.
pub fn parse_color(s: &str) -> PosterResult<Rgba> {
    if let Some(c) = parse_rgba(s) {
        return Ok(c);
    }
    hex_to_rgb(s)
        .map(Rgba::opaque)
        .map_err(|_| PosterError::invalid_input(format!("invalid color \"{s}\"")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
