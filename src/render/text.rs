//! Text fields, rendered as one SVG `<text>` element per field over the canvas.
//!
//! Horizontal alignment maps to `text-anchor`; the anchor's vertical edge picks the
//! `dominant-baseline`, so a top-anchored field hangs below its point and a bottom-anchored one
//! sits above it.

use resvg::tiny_skia::Pixmap;

use crate::assets::color::parse_color;
use crate::assets::fonts::{DEFAULT_FONT, FontBook};
use crate::foundation::error::{PosterError, PosterResult};
use crate::layout::position::{HorizontalEdge, VerticalEdge, resolve_position};
use crate::render::svg_raster::{draw_svg, num, parse_svg, xml_escape};
use crate::scene::model::{Shadow, TextAlign, TextField, TextStyle};

/// Passes of proportional shrinking for `maxWidth`.
const FIT_PASSES: usize = 3;

/// Renders text fields against one font snapshot.
pub struct TextRenderer<'a> {
    book: &'a FontBook,
    options: usvg::Options<'static>,
    strict_fonts: bool,
}

impl std::fmt::Debug for TextRenderer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("book", self.book)
            .field("strict_fonts", &self.strict_fonts)
            .finish_non_exhaustive()
    }
}

/// Fully resolved parameters of one `<text>` element.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextRun {
    pub(crate) text: String,
    pub(crate) family: String,
    pub(crate) x: i64,
    pub(crate) y: i64,
    pub(crate) font_size: f64,
    pub(crate) letter_spacing: f64,
    pub(crate) align: TextAlign,
    pub(crate) baseline: &'static str,
}

impl<'a> TextRenderer<'a> {
    /// Renderer resolving families against `book`.
    pub fn new(book: &'a FontBook, strict_fonts: bool) -> Self {
        Self {
            book,
            options: book.svg_options(),
            strict_fonts,
        }
    }

    /// Draw `value` into `canvas` according to `field`.
    pub fn draw(&self, canvas: &mut Pixmap, field: &TextField, value: &str) -> PosterResult<()> {
        let mut run = self.layout(field, value, canvas.width(), canvas.height())?;
        if run.text.trim().is_empty() {
            return Ok(());
        }

        let mut tree = parse_svg(
            &text_svg(&run, &field.style, canvas.width(), canvas.height())?,
            &self.options,
        )?;

        if let Some(max_width) = field.style.max_width {
            for _ in 0..FIT_PASSES {
                let width = f64::from(tree.root().bounding_box().width());
                if !(width.is_finite() && width > max_width) {
                    break;
                }
                let scale = max_width / width;
                run.font_size *= scale;
                run.letter_spacing *= scale;
                tracing::debug!(
                    field = %field.id,
                    width,
                    max_width,
                    font_size = run.font_size,
                    "shrinking text to fit"
                );
                tree = parse_svg(
                    &text_svg(&run, &field.style, canvas.width(), canvas.height())?,
                    &self.options,
                )?;
            }
        }

        if !tree.root().has_children() {
            tracing::warn!(field = %field.id, family = %run.family, "no usable font face, text skipped");
            return Ok(());
        }
        draw_svg(&tree, canvas);
        Ok(())
    }

    /// Resolve font, position, alignment and transform for a field.
    pub(crate) fn layout(
        &self,
        field: &TextField,
        value: &str,
        canvas_width: u32,
        canvas_height: u32,
    ) -> PosterResult<TextRun> {
        let style = &field.style;
        let family = self.book.resolve_family(&style.font_family, self.strict_fonts)?;
        let p = &field.position;
        let point = resolve_position(p.anchor, p.offset_x, p.offset_y, canvas_width, canvas_height);
        let (h_edge, v_edge) = p.anchor.edges();

        let align = style.align.unwrap_or(match h_edge {
            HorizontalEdge::Start => TextAlign::Left,
            HorizontalEdge::Middle => TextAlign::Center,
            HorizontalEdge::End => TextAlign::Right,
        });
        let baseline = match v_edge {
            VerticalEdge::Start => "hanging",
            VerticalEdge::Middle => "central",
            VerticalEdge::End => "text-after-edge",
        };

        Ok(TextRun {
            text: style.text_transform.unwrap_or_default().apply(value),
            family,
            x: point.x,
            y: point.y,
            font_size: style.font_size,
            letter_spacing: style.letter_spacing.unwrap_or(0.0),
            align,
            baseline,
        })
    }
}

/// SVG document holding a single `<text>` element.
pub(crate) fn text_svg(
    run: &TextRun,
    style: &TextStyle,
    canvas_width: u32,
    canvas_height: u32,
) -> PosterResult<String> {
    if !(run.font_size.is_finite() && run.font_size > 0.0) {
        return Err(PosterError::invalid_input(format!(
            "font size must be > 0, got {}",
            run.font_size
        )));
    }
    let (fill, fill_opacity) = parse_color(&style.color)?.to_svg_paint();
    let anchor = match run.align {
        TextAlign::Left => "start",
        TextAlign::Center => "middle",
        TextAlign::Right => "end",
    };

    let mut attrs = format!(
        r#" x="{}" y="{}" font-family="{}" font-size="{}" fill="{fill}" fill-opacity="{}" text-anchor="{anchor}" dominant-baseline="{}""#,
        run.x,
        run.y,
        font_family_attr(&run.family),
        num(run.font_size),
        num(f64::from(fill_opacity)),
        run.baseline,
    );
    if let Some(weight) = style.font_weight {
        attrs.push_str(&format!(r#" font-weight="{weight}""#));
    }
    if run.letter_spacing != 0.0 {
        attrs.push_str(&format!(r#" letter-spacing="{}""#, num(run.letter_spacing)));
    }
    if let Some(stroke) = &style.stroke {
        let (color, opacity) = parse_color(&stroke.color)?.to_svg_paint();
        attrs.push_str(&format!(
            r#" stroke="{color}" stroke-opacity="{}" stroke-width="{}" stroke-linejoin="round" paint-order="stroke""#,
            num(f64::from(opacity)),
            num(stroke.width),
        ));
    }

    let defs = match &style.shadow {
        Some(shadow) => {
            attrs.push_str(r#" filter="url(#shadow)""#);
            shadow_filter(shadow)?
        }
        None => String::new(),
    };

    Ok(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{canvas_width}" height="{canvas_height}" viewBox="0 0 {canvas_width} {canvas_height}">{defs}<text{attrs} xml:space="preserve">{}</text></svg>"#,
        xml_escape(&run.text)
    ))
}

fn shadow_filter(shadow: &Shadow) -> PosterResult<String> {
    let (color, opacity) = parse_color(&shadow.color)?.to_svg_paint();
    Ok(format!(
        r#"<defs><filter id="shadow" x="-50%" y="-50%" width="200%" height="200%"><feDropShadow dx="{}" dy="{}" stdDeviation="{}" flood-color="{color}" flood-opacity="{}"/></filter></defs>"#,
        num(shadow.offset_x),
        num(shadow.offset_y),
        num(shadow.blur.max(0.0)),
        num(f64::from(opacity)),
    ))
}

fn font_family_attr(family: &str) -> String {
    const GENERIC: &[&str] = &[DEFAULT_FONT, "serif", "monospace", "cursive", "fantasy"];
    if GENERIC.contains(&family) {
        family.to_owned()
    } else {
        format!("'{}'", xml_escape(&family.replace('\'', "")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
