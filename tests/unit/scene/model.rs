use super::*;

#[test]
fn text_transform_cases() {
    assert_eq!(TextTransform::None.apply("jOhn doe"), "jOhn doe");
    assert_eq!(TextTransform::Uppercase.apply("jOhn doe"), "JOHN DOE");
    assert_eq!(TextTransform::Lowercase.apply("jOhn doe"), "john doe");
    assert_eq!(
        TextTransform::Capitalize.apply("world  open 2026 finals"),
        "World  Open 2026 Finals"
    );
}

#[test]
fn tagged_unions_use_kebab_case_discriminants() {
    let mask: Mask = serde_json::from_str(r#"{"type":"rounded-rect","radius":12}"#).unwrap();
    assert_eq!(mask, Mask::RoundedRect { radius: 12.0 });
    let mask: Mask = serde_json::from_str(r#"{"type":"circle"}"#).unwrap();
    assert_eq!(mask, Mask::Circle);

    let bg: Background = serde_json::from_str(
        r##"{"type":"gradient","direction":"to-bottom-right","stops":[{"color":"#000000","position":0},{"color":"#ffffff","position":100}]}"##,
    )
    .unwrap();
    assert!(matches!(
        bg,
        Background::Gradient {
            direction: GradientDirection::ToBottomRight,
            ..
        }
    ));
}

#[test]
fn unknown_fields_are_rejected() {
    let err = serde_json::from_str::<FieldPosition>(r#"{"anchor":"center","x":4}"#);
    assert!(err.is_err());
}

#[test]
fn optional_members_are_omitted_when_serialized() {
    let field = PhotoField {
        id: "main".into(),
        position: FieldPosition {
            anchor: Anchor::Center,
            offset_x: 0,
            offset_y: 0,
        },
        size: SizeDef {
            width: 10,
            height: 10,
        },
        mask: None,
        border: None,
        shadow: None,
    };
    let v = serde_json::to_value(&field).unwrap();
    assert!(v.get("mask").is_none());
    assert_eq!(v["position"]["offsetX"], 0);
}
