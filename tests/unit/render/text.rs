use super::*;

use crate::assets::fonts::FontRegistry;
use crate::layout::position::Anchor;

fn text_field(anchor: &str, style: serde_json::Value) -> TextField {
    let mut s = serde_json::json!({ "fontFamily": "Inter", "fontSize": 40, "color": "#ffffff" });
    for (k, v) in style.as_object().unwrap() {
        s[k] = v.clone();
    }
    serde_json::from_value(serde_json::json!({
        "id": "title",
        "position": { "anchor": anchor, "offsetX": 5, "offsetY": -5 },
        "style": s
    }))
    .unwrap()
}

fn empty_book() -> FontBook {
    FontRegistry::new().font_book(false)
}

#[test]
fn alignment_defaults_from_the_anchor_edge() {
    let book = empty_book();
    let r = TextRenderer::new(&book, false);
    for (anchor, align, baseline) in [
        ("top-left", TextAlign::Left, "hanging"),
        ("center", TextAlign::Center, "central"),
        ("bottom-right", TextAlign::Right, "text-after-edge"),
    ] {
        let run = r
            .layout(&text_field(anchor, serde_json::json!({})), "x", 100, 50)
            .unwrap();
        assert_eq!(run.align, align, "{anchor}");
        assert_eq!(run.baseline, baseline, "{anchor}");
    }

    let run = r
        .layout(
            &text_field("top-left", serde_json::json!({ "align": "right" })),
            "x",
            100,
            50,
        )
        .unwrap();
    assert_eq!(run.align, TextAlign::Right);
}

#[test]
fn layout_resolves_position_and_transform() {
    let book = empty_book();
    let r = TextRenderer::new(&book, false);
    let field = text_field(
        "bottom-center",
        serde_json::json!({ "textTransform": "uppercase", "letterSpacing": 2 }),
    );
    let run = r.layout(&field, "gold medal", 200, 100).unwrap();
    assert_eq!((run.x, run.y), (105, 95));
    assert_eq!(run.text, "GOLD MEDAL");
    assert_eq!(run.family, DEFAULT_FONT);
    assert_eq!(run.letter_spacing, 2.0);
    assert_eq!(field.position.anchor, Anchor::BottomCenter);
}

#[test]
fn strict_mode_rejects_unregistered_families() {
    let book = empty_book();
    let err = TextRenderer::new(&book, true)
        .layout(&text_field("center", serde_json::json!({})), "x", 10, 10)
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_INPUT");
    assert!(err.to_string().contains("Inter"));
}

#[test]
fn svg_carries_every_style_attribute() {
    let field = text_field(
        "center",
        serde_json::json!({
            "color": "rgba(255, 0, 0, 0.5)",
            "fontWeight": 700,
            "stroke": { "width": 3, "color": "#000000" },
            "shadow": { "offsetX": 2, "offsetY": 4, "blur": 6, "color": "rgba(0,0,0,0.4)" }
        }),
    );
    let run = TextRun {
        text: "A & B <C>".into(),
        family: "Bebas Neue".into(),
        x: 10,
        y: 20,
        font_size: 48.0,
        letter_spacing: 1.5,
        align: TextAlign::Center,
        baseline: "central",
    };
    let svg = text_svg(&run, &field.style, 300, 200).unwrap();
    for needle in [
        r#"font-family="'Bebas Neue'""#,
        r#"font-size="48""#,
        r##"fill="#ff0000""##,
        r#"fill-opacity="0.5""#,
        r#"text-anchor="middle""#,
        r#"dominant-baseline="central""#,
        r#"font-weight="700""#,
        r#"letter-spacing="1.5""#,
        r#"stroke-width="3""#,
        r#"paint-order="stroke""#,
        r#"filter="url(#shadow)""#,
        r#"stdDeviation="6""#,
        "A &amp; B &lt;C&gt;",
    ] {
        assert!(svg.contains(needle), "missing {needle} in {svg}");
    }
}

#[test]
fn generic_family_is_not_quoted() {
    assert_eq!(font_family_attr("sans-serif"), "sans-serif");
    assert_eq!(font_family_attr("Oswald"), "'Oswald'");
}

#[test]
fn drawing_without_any_font_face_is_not_an_error() {
    let book = empty_book();
    let mut canvas = Pixmap::new(50, 20).unwrap();
    TextRenderer::new(&book, false)
        .draw(
            &mut canvas,
            &text_field("center", serde_json::json!({ "maxWidth": 10 })),
            "hello",
        )
        .unwrap();
}

#[test]
fn invalid_color_is_invalid_input() {
    let field = text_field("center", serde_json::json!({ "color": "blue" }));
    let book = empty_book();
    let run = TextRenderer::new(&book, false)
        .layout(&field, "x", 10, 10)
        .unwrap();
    assert_eq!(
        text_svg(&run, &field.style, 10, 10).unwrap_err().code(),
        "INVALID_INPUT"
    );
}
