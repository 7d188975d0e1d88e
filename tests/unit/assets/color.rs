use super::*;

#[test]
fn hex_validity_is_strict() {
    assert!(is_valid_hex_color("#1a1a2e"));
    assert!(is_valid_hex_color("#FFD700"));
    assert!(!is_valid_hex_color("#fff"));
    assert!(!is_valid_hex_color("1a1a2e"));
    assert!(!is_valid_hex_color("#1a1a2e0"));
    assert!(!is_valid_hex_color("#1a1a2g"));
    assert!(!is_valid_hex_color("red"));
    assert!(!is_valid_hex_color(""));
}

#[test]
fn hex_round_trips_every_channel_value() {
    for v in [0u8, 1, 15, 16, 127, 128, 200, 254, 255] {
        let s = format!("#{v:02x}{:02X}{:02x}", 255 - v, v / 2);
        assert!(is_valid_hex_color(&s), "{s}");
        let rgb = hex_to_rgb(&s).unwrap();
        assert_eq!(
            rgb,
            Rgb {
                r: v,
                g: 255 - v,
                b: v / 2
            }
        );
    }
}

#[test]
fn hex_to_rgb_rejects_non_hex() {
    for bad in ["#abc", "rgb(1,2,3)", "#12345", "#1234567", "#zzzzzz"] {
        let err = hex_to_rgb(bad).unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT", "{bad}");
    }
}

#[test]
fn parse_rgba_defaults_alpha_to_one() {
    let c = parse_rgba("rgb(10, 20, 30)").unwrap();
    assert_eq!((c.r, c.g, c.b), (10, 20, 30));
    assert_eq!(c.alpha, 1.0);

    let c = parse_rgba("rgba(0,0,0,0.5)").unwrap();
    assert_eq!(c.alpha, 0.5);

    let c = parse_rgba("rgba(1,2,3)").unwrap();
    assert_eq!(c.alpha, 1.0);
}

#[test]
fn parse_rgba_rejects_malformed_forms() {
    assert!(parse_rgba("rgb(1,2,3,0.5)").is_none());
    assert!(parse_rgba("rgba(256,0,0,1)").is_none());
    assert!(parse_rgba("rgba(0,0,0,1.5)").is_none());
    assert!(parse_rgba("rgba(0,0,0").is_none());
    assert!(parse_rgba("hsl(0,0,0)").is_none());
    assert!(parse_rgba("#000000").is_none());
}

#[test]
fn parse_color_accepts_both_syntaxes() {
    let c = parse_color("#ff0000").unwrap();
    assert_eq!((c.r, c.g, c.b, c.alpha), (255, 0, 0, 1.0));

    let c = parse_color("rgba(0, 0, 0, 0.25)").unwrap();
    assert_eq!(c.alpha, 0.25);

    assert_eq!(parse_color("white").unwrap_err().code(), "INVALID_INPUT");
    assert_eq!(parse_color("#fff").unwrap_err().code(), "INVALID_INPUT");
}

#[test]
fn svg_paint_splits_opacity() {
    let (hex, opacity) = parse_color("rgba(255,128,0,0.4)").unwrap().to_svg_paint();
    assert_eq!(hex, "#ff8000");
    assert!((opacity - 0.4).abs() < 1e-6);
}
