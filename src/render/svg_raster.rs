use resvg::tiny_skia::{Pixmap, Transform};

use crate::foundation::error::{PosterError, PosterResult};

/// Parse a synthesized SVG document.
pub(crate) fn parse_svg(svg: &str, opts: &usvg::Options<'_>) -> PosterResult<usvg::Tree> {
    usvg::Tree::from_str(svg, opts)
        .map_err(|e| PosterError::image_processing(format!("svg parse failed: {e}")))
}

/// Rasterize `tree` over `target` in canvas pixel space (the document's viewBox must match the
/// target size).
pub(crate) fn draw_svg(tree: &usvg::Tree, target: &mut Pixmap) {
    resvg::render(tree, Transform::default(), &mut target.as_mut());
}

/// Escape text for use in SVG character data and attribute values.
pub(crate) fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => out.push(c),
        }
    }
    out
}

/// Shortest decimal form for SVG numbers.
pub(crate) fn num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{:.3}", v)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_owned()
    }
}
