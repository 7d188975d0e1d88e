//! Photo slot rendering: cover crop, clip shape, shadow, border.

use image::DynamicImage;
use image::imageops::FilterType;
use kurbo::{PathEl, Shape};
use resvg::tiny_skia::{self, FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Transform};

use crate::assets::color::parse_color;
use crate::foundation::core::{PixelPoint, PixelSize};
use crate::foundation::error::{PosterError, PosterResult};
use crate::layout::position::resolve_position;
use crate::render::blur::{blur_pixmap, blur_radius};
use crate::render::raster::{new_pixmap, pixmap_from_rgba};
use crate::scene::model::{Mask, PhotoField, Shadow, Stroke};
use crate::schema::validate::MAX_SHADOW_BLUR;

const FLATTEN_TOLERANCE: f64 = 0.1;

/// Cover-resize `photo` to the slot size (centered crop, no distortion).
pub fn fit_photo(photo: &DynamicImage, size: PixelSize) -> PosterResult<Pixmap> {
    if photo.width() == 0 || photo.height() == 0 {
        return Err(PosterError::invalid_input("photo has zero width or height"));
    }
    let resized = photo.resize_to_fill(size.width, size.height, FilterType::Lanczos3);
    pixmap_from_rgba(&resized.to_rgba8())
}

/// Top-left corner of a photo slot on a `canvas` sized canvas.
pub fn slot_origin(field: &PhotoField, slot: PixelSize, canvas: PixelSize) -> PixelPoint {
    let p = &field.position;
    let point = resolve_position(p.anchor, p.offset_x, p.offset_y, canvas.width, canvas.height);
    p.anchor.place_box(point, slot.width, slot.height)
}

/// Render one photo slot onto `canvas`: shadow, then the clipped photo, then the border.
pub fn composite_photo(
    canvas: &mut Pixmap,
    photo: &DynamicImage,
    field: &PhotoField,
) -> PosterResult<()> {
    let slot = PixelSize::from_signed(field.size.width, field.size.height)?;
    let canvas_size = PixelSize::new(canvas.width(), canvas.height())?;
    let origin = slot_origin(field, slot, canvas_size);
    let (x, y) = (to_i32(origin.x)?, to_i32(origin.y)?);

    let mask = field.mask.unwrap_or_default();
    let outline = slot_path(mask, slot)?;

    if let Some(shadow) = &field.shadow {
        draw_shadow(canvas, &outline, slot, shadow, x, y)?;
    }

    let mut layer = fit_photo(photo, slot)?;
    if mask != Mask::None {
        let mut clip = tiny_skia::Mask::new(slot.width, slot.height)
            .ok_or_else(|| PosterError::image_processing("failed to allocate photo mask"))?;
        clip.fill_path(&outline, FillRule::Winding, true, Transform::identity());
        layer.apply_mask(&clip);
    }
    canvas.draw_pixmap(
        x,
        y,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );

    if let Some(border) = &field.border {
        draw_border(canvas, &outline, border, x, y)?;
    }
    Ok(())
}

/// Outline of the clip shape in slot-local coordinates.
fn slot_path(mask: Mask, slot: PixelSize) -> PosterResult<tiny_skia::Path> {
    let (w, h) = (f64::from(slot.width), f64::from(slot.height));
    let rect = kurbo::Rect::new(0.0, 0.0, w, h);
    let elements: Vec<PathEl> = match mask {
        Mask::None => rect.path_elements(FLATTEN_TOLERANCE).collect(),
        Mask::Circle => kurbo::Ellipse::from_rect(rect)
            .path_elements(FLATTEN_TOLERANCE)
            .collect(),
        Mask::RoundedRect { radius } => {
            let r = radius.clamp(0.0, w.min(h) / 2.0);
            kurbo::RoundedRect::from_rect(rect, r)
                .path_elements(FLATTEN_TOLERANCE)
                .collect()
        }
    };
    to_skia_path(&elements)
}

fn to_skia_path(elements: &[PathEl]) -> PosterResult<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in elements {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32),
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
        .ok_or_else(|| PosterError::image_processing("photo outline is empty"))
}

fn draw_shadow(
    canvas: &mut Pixmap,
    outline: &tiny_skia::Path,
    slot: PixelSize,
    shadow: &Shadow,
    x: i32,
    y: i32,
) -> PosterResult<()> {
    if !(shadow.blur.is_finite() && (0.0..=MAX_SHADOW_BLUR).contains(&shadow.blur)) {
        return Err(PosterError::invalid_input(format!(
            "shadow blur must be in [0, {MAX_SHADOW_BLUR}], got {}",
            shadow.blur
        )));
    }
    let color = parse_color(&shadow.color)?;
    let sigma = shadow.blur as f32;
    let pad = blur_radius(sigma) + 1;
    let padded = |side: u32| {
        pad.checked_mul(2)
            .and_then(|p| side.checked_add(p))
            .ok_or_else(|| PosterError::invalid_input("shadow layer size overflow"))
    };

    let mut layer = new_pixmap(padded(slot.width)?, padded(slot.height)?)?;
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    layer.fill_path(
        outline,
        &paint,
        FillRule::Winding,
        Transform::from_translate(pad as f32, pad as f32),
        None,
    );
    blur_pixmap(&mut layer, sigma)?;

    let pad = pad as i32;
    canvas.draw_pixmap(
        x - pad + shadow.offset_x.round() as i32,
        y - pad + shadow.offset_y.round() as i32,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
    Ok(())
}

fn draw_border(
    canvas: &mut Pixmap,
    outline: &tiny_skia::Path,
    border: &Stroke,
    x: i32,
    y: i32,
) -> PosterResult<()> {
    let color = parse_color(&border.color)?;
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    let stroke = tiny_skia::Stroke {
        width: border.width as f32,
        ..tiny_skia::Stroke::default()
    };
    canvas.stroke_path(
        outline,
        &paint,
        &stroke,
        Transform::from_translate(x as f32, y as f32),
        None,
    );
    Ok(())
}

fn to_i32(v: i64) -> PosterResult<i32> {
    i32::try_from(v).map_err(|_| PosterError::invalid_input(format!("coordinate {v} out of range")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/photo.rs"]
mod tests;
