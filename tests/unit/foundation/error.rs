use super::*;
use crate::schema::validate::{SchemaError, SchemaPathElem};

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PosterError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(
        PosterError::template_not_found("x")
            .to_string()
            .contains("template not found:")
    );
    assert!(
        PosterError::font_load("x")
            .to_string()
            .contains("font load error:")
    );
    assert!(
        PosterError::image_processing("x")
            .to_string()
            .contains("image processing error:")
    );
}

#[test]
fn codes_and_statuses_match_kinds() {
    let cases = [
        (PosterError::invalid_input("x"), "INVALID_INPUT", 400),
        (PosterError::template_not_found("x"), "TEMPLATE_NOT_FOUND", 404),
        (PosterError::font_load("x"), "FONT_LOAD_ERROR", 500),
        (PosterError::image_processing("x"), "IMAGE_PROCESSING_ERROR", 500),
    ];
    for (err, code, status) in cases {
        assert_eq!(err.code(), code);
        assert_eq!(err.status(), status);
    }
}

#[test]
fn validation_error_keeps_every_issue() {
    let errors = SchemaErrors {
        errors: vec![
            SchemaError::at(&[SchemaPathElem::Field("id")], "must be non-empty"),
            SchemaError::at(&[SchemaPathElem::Field("version")], "bad version"),
        ],
    };
    let err = PosterError::from(errors);
    assert_eq!(err.code(), "TEMPLATE_VALIDATION_ERROR");
    assert_eq!(err.status(), 400);
    let msg = err.to_string();
    assert!(msg.contains("$.id: must be non-empty"));
    assert!(msg.contains("$.version: bad version"));
}
