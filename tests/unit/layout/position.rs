use super::*;

#[test]
fn every_anchor_resolves_to_documented_base_plus_offset() {
    let (w, h) = (1080u32, 1350u32);
    let expected = |a: Anchor| match a {
        Anchor::Center => (540, 675),
        Anchor::TopLeft => (0, 0),
        Anchor::TopCenter => (540, 0),
        Anchor::TopRight => (1080, 0),
        Anchor::CenterLeft => (0, 675),
        Anchor::CenterRight => (1080, 675),
        Anchor::BottomLeft => (0, 1350),
        Anchor::BottomCenter => (540, 1350),
        Anchor::BottomRight => (1080, 1350),
    };

    for anchor in Anchor::ALL {
        for (dx, dy) in [(0, 0), (17, -40), (-2000, 3000)] {
            let p = resolve_position(anchor, dx, dy, w, h);
            let (bx, by) = expected(anchor);
            assert_eq!(p, PixelPoint::new(bx + dx, by + dy), "{anchor:?}");
        }
    }
}

#[test]
fn odd_dimensions_use_integer_halves() {
    let p = resolve_position(Anchor::Center, 0, 0, 101, 51);
    assert_eq!(p, PixelPoint::new(50, 25));
}

#[test]
fn place_box_aligns_like_the_anchor() {
    let p = PixelPoint::new(500, 400);
    assert_eq!(Anchor::TopLeft.place_box(p, 100, 60), PixelPoint::new(500, 400));
    assert_eq!(Anchor::Center.place_box(p, 100, 60), PixelPoint::new(450, 370));
    assert_eq!(
        Anchor::BottomRight.place_box(p, 100, 60),
        PixelPoint::new(400, 340)
    );
    assert_eq!(
        Anchor::CenterRight.place_box(p, 100, 60),
        PixelPoint::new(400, 370)
    );
}

#[test]
fn anchors_parse_from_kebab_case() {
    let a: Anchor = serde_json::from_str("\"bottom-center\"").unwrap();
    assert_eq!(a, Anchor::BottomCenter);
    let a: Anchor = serde_json::from_str("\"left-center\"").unwrap();
    assert_eq!(a, Anchor::CenterLeft);
    assert!(serde_json::from_str::<Anchor>("\"middle\"").is_err());
}
