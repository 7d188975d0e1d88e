//! Background canvas construction.
//!
//! Gradients are written as a small SVG document and rasterized with `resvg`, so the gradient
//! math (stop interpolation, radial falloff) is the SVG renderer's.

use resvg::tiny_skia::{Color, Pixmap};

use crate::assets::color::hex_to_rgb;
use crate::foundation::core::PixelSize;
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::raster::new_pixmap;
use crate::render::svg_raster::{draw_svg, num, parse_svg};
use crate::scene::model::{GradientDirection, GradientStop};

/// Canvas fill.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasFill {
    /// Single opaque `#rrggbb` color.
    Solid {
        /// Fill color.
        color: String,
    },
    /// 2 to 4 stop gradient.
    Gradient {
        /// Geometry.
        direction: GradientDirection,
        /// Stops, kept in the given order.
        stops: Vec<GradientStop>,
    },
}

/// Canvas request.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSpec {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Fill.
    pub fill: CanvasFill,
}

/// Build a filled, fully opaque canvas.
pub fn create_canvas(spec: &CanvasSpec) -> PosterResult<Pixmap> {
    let size = PixelSize::new(spec.width, spec.height)?;
    match &spec.fill {
        CanvasFill::Solid { color } => {
            let rgb = hex_to_rgb(color)?;
            let mut pixmap = new_pixmap(size.width, size.height)?;
            pixmap.fill(Color::from_rgba8(rgb.r, rgb.g, rgb.b, 255));
            Ok(pixmap)
        }
        CanvasFill::Gradient { direction, stops } => {
            let svg = gradient_svg(size, *direction, stops)?;
            let tree = parse_svg(&svg, &usvg::Options::default())?;
            let mut pixmap = new_pixmap(size.width, size.height)?;
            draw_svg(&tree, &mut pixmap);
            Ok(pixmap)
        }
    }
}

/// SVG document painting a full-size rectangle with the gradient.
pub fn gradient_svg(
    size: PixelSize,
    direction: GradientDirection,
    stops: &[GradientStop],
) -> PosterResult<String> {
    if !(2..=4).contains(&stops.len()) {
        return Err(PosterError::invalid_input(format!(
            "gradient needs 2-4 stops, got {}",
            stops.len()
        )));
    }

    let mut stop_xml = String::new();
    for stop in stops {
        let rgb = hex_to_rgb(&stop.color)?;
        if !(stop.position.is_finite() && (0.0..=100.0).contains(&stop.position)) {
            return Err(PosterError::invalid_input(format!(
                "gradient stop position must be in [0, 100], got {}",
                stop.position
            )));
        }
        stop_xml.push_str(&format!(
            r##"<stop offset="{}%" stop-color="#{:02x}{:02x}{:02x}"/>"##,
            num(stop.position),
            rgb.r,
            rgb.g,
            rgb.b
        ));
    }

    // Bounding-box units: diagonals run corner to corner and the radial reaches the corners.
    let gradient = match direction {
        GradientDirection::ToBottom => {
            format!(r#"<linearGradient id="bg" x1="0" y1="0" x2="0" y2="1">{stop_xml}</linearGradient>"#)
        }
        GradientDirection::ToRight => {
            format!(r#"<linearGradient id="bg" x1="0" y1="0" x2="1" y2="0">{stop_xml}</linearGradient>"#)
        }
        GradientDirection::ToBottomRight => {
            format!(r#"<linearGradient id="bg" x1="0" y1="0" x2="1" y2="1">{stop_xml}</linearGradient>"#)
        }
        GradientDirection::Radial => format!(
            r#"<radialGradient id="bg" cx="0.5" cy="0.5" r="0.7071">{stop_xml}</radialGradient>"#
        ),
    };

    let (w, h) = (size.width, size.height);
    Ok(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><defs>{gradient}</defs><rect x="0" y="0" width="{w}" height="{h}" fill="url(#bg)"/></svg>"#
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
