use super::*;

use crate::layout::position::Anchor;

fn red_photo(w: u32, h: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        w,
        h,
        image::Rgba([255, 0, 0, 255]),
    ))
}

fn field(json: serde_json::Value) -> PhotoField {
    let mut base = serde_json::json!({
        "id": "main",
        "position": { "anchor": "center" },
        "size": { "width": 100, "height": 100 }
    });
    for (k, v) in json.as_object().unwrap() {
        base[k] = v.clone();
    }
    serde_json::from_value(base).unwrap()
}

fn alpha(p: &Pixmap, x: u32, y: u32) -> u8 {
    p.pixel(x, y).unwrap().alpha()
}

#[test]
fn fit_photo_cover_crops_to_slot() {
    let slot = PixelSize::new(60, 30).unwrap();
    let p = fit_photo(&red_photo(100, 100), slot).unwrap();
    assert_eq!((p.width(), p.height()), (60, 30));
    assert_eq!(alpha(&p, 0, 0), 255);
}

#[test]
fn slot_origin_follows_the_anchor() {
    let canvas = PixelSize::new(200, 100).unwrap();
    let slot = PixelSize::new(40, 20).unwrap();

    let centered = field(serde_json::json!({}));
    assert_eq!(
        slot_origin(&centered, slot, canvas),
        PixelPoint::new(80, 40)
    );

    let mut corner = centered.clone();
    corner.position.anchor = Anchor::BottomRight;
    corner.position.offset_x = -10;
    assert_eq!(slot_origin(&corner, slot, canvas), PixelPoint::new(150, 80));
}

#[test]
fn unmasked_photo_fills_its_slot() {
    let mut canvas = Pixmap::new(200, 200).unwrap();
    composite_photo(&mut canvas, &red_photo(10, 10), &field(serde_json::json!({}))).unwrap();
    assert_eq!(alpha(&canvas, 50, 50), 255);
    assert_eq!(alpha(&canvas, 149, 149), 255);
    assert_eq!(alpha(&canvas, 49, 100), 0);
    assert_eq!(alpha(&canvas, 150, 100), 0);
}

#[test]
fn circle_mask_clears_the_corners() {
    let mut canvas = Pixmap::new(200, 200).unwrap();
    let f = field(serde_json::json!({ "mask": { "type": "circle" } }));
    composite_photo(&mut canvas, &red_photo(300, 200), &f).unwrap();

    assert_eq!(alpha(&canvas, 52, 52), 0);
    assert_eq!(alpha(&canvas, 147, 147), 0);
    let center = canvas.pixel(100, 100).unwrap();
    assert_eq!((center.red(), center.alpha()), (255, 255));
}

#[test]
fn rounded_rect_keeps_edges_but_not_corners() {
    let mut canvas = Pixmap::new(200, 200).unwrap();
    let f = field(serde_json::json!({ "mask": { "type": "rounded-rect", "radius": 30 } }));
    composite_photo(&mut canvas, &red_photo(100, 100), &f).unwrap();
    assert_eq!(alpha(&canvas, 51, 51), 0);
    assert_eq!(alpha(&canvas, 51, 100), 255);
}

#[test]
fn border_is_drawn_on_the_outline() {
    let mut canvas = Pixmap::new(200, 200).unwrap();
    let f = field(serde_json::json!({ "border": { "width": 6, "color": "#00ff00" } }));
    composite_photo(&mut canvas, &red_photo(100, 100), &f).unwrap();
    let edge = canvas.pixel(50, 100).unwrap();
    assert!(edge.green() > 200 && edge.red() < 50, "{edge:?}");
    let inside = canvas.pixel(100, 100).unwrap();
    assert_eq!(inside.red(), 255);
}

#[test]
fn shadow_is_offset_and_sits_below_the_photo() {
    let mut canvas = Pixmap::new(200, 200).unwrap();
    let f = field(serde_json::json!({
        "shadow": { "offsetX": 20, "offsetY": 0, "blur": 2, "color": "rgba(0,0,0,0.8)" }
    }));
    composite_photo(&mut canvas, &red_photo(100, 100), &f).unwrap();

    let shadow = canvas.pixel(160, 100).unwrap();
    assert!(shadow.alpha() > 100, "{shadow:?}");
    assert_eq!(shadow.red(), 0);
    assert_eq!(alpha(&canvas, 40, 100), 0);
    assert_eq!(canvas.pixel(100, 100).unwrap().red(), 255);
}

#[test]
fn invalid_colors_and_sizes_fail() {
    let mut canvas = Pixmap::new(50, 50).unwrap();
    let bad_border = field(serde_json::json!({ "border": { "width": 2, "color": "#abc" } }));
    assert_eq!(
        composite_photo(&mut canvas, &red_photo(5, 5), &bad_border)
            .unwrap_err()
            .code(),
        "INVALID_INPUT"
    );
    let zero = field(serde_json::json!({ "size": { "width": 0, "height": 10 } }));
    assert_eq!(
        composite_photo(&mut canvas, &red_photo(5, 5), &zero)
            .unwrap_err()
            .code(),
        "INVALID_INPUT"
    );
}

#[test]
fn oversized_shadow_blur_is_rejected_before_allocating() {
    let mut canvas = Pixmap::new(50, 50).unwrap();
    for blur in [1.5e9, 1e9, MAX_SHADOW_BLUR + 0.5, f64::INFINITY] {
        let mut f = field(serde_json::json!({
            "shadow": { "blur": 0, "color": "#000000" }
        }));
        if let Some(s) = f.shadow.as_mut() {
            s.blur = blur;
        }
        let err = composite_photo(&mut canvas, &red_photo(5, 5), &f).unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT", "{blur}");
    }
    assert!(canvas.data().iter().all(|&b| b == 0));
}
