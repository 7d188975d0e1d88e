use super::*;

fn classic() -> Arc<PosterTemplate> {
    TemplateRegistry::with_bundled()
        .unwrap()
        .load_template("classic")
        .unwrap()
}

fn data(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(w, h, image::Rgb([10, 200, 30]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[test]
fn stages_are_ordered_with_fixed_percents() {
    let percents: Vec<u8> = ComposeStage::ALL.iter().map(|s| s.percent()).collect();
    assert_eq!(percents, vec![0, 10, 30, 50, 70, 90, 100]);
    assert!(ComposeStage::ALL.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(ComposeStage::RenderingText.to_string(), "rendering-text");
}

#[test]
fn every_missing_field_is_reported_in_template_order() {
    let t = classic();
    let err = check_required_text(&t, &data(&[("athleteName", "J"), ("date", "   ")])).unwrap_err();
    assert_eq!(err.code(), "INVALID_INPUT");
    assert_eq!(
        err.to_string(),
        "invalid input: missing required text fields: achievement, tournamentName, date"
    );

    let complete = data(&[
        ("athleteName", "J"),
        ("achievement", "Gold"),
        ("tournamentName", "Worlds"),
        ("date", "2026"),
    ]);
    assert!(check_required_text(&t, &complete).is_ok());
}

#[test]
fn placeholders_cover_every_text_field() {
    let t = classic();
    let d = placeholder_data(&t);
    assert_eq!(d.len(), t.text.len());
    assert_eq!(d["athleteName"], "Athlete Name");
    assert!(check_required_text(&t, &d).is_ok());
}

fn engine(opts: EngineOpts) -> PosterEngine {
    PosterEngine::new(
        Arc::new(FontRegistry::new()),
        Arc::new(TemplateRegistry::with_bundled().unwrap()),
        opts.with_system_fonts(false),
    )
}

#[test]
fn photo_decoding_errors_are_invalid_input() {
    let e = engine(EngineOpts::default());
    assert_eq!(e.decode_photo(b"GIF89a-but-not-really").unwrap_err().code(), "INVALID_INPUT");
    assert_eq!(e.decode_photo(&[]).unwrap_err().code(), "INVALID_INPUT");
    let ok = e.decode_photo(&png(3, 2)).unwrap();
    assert_eq!((ok.width(), ok.height()), (3, 2));
}

#[test]
fn photo_over_the_byte_limit_is_rejected_before_decoding() {
    let photo = png(64, 64);
    let limit = photo.len() as u64 - 1;
    let e = engine(EngineOpts::default().with_max_image_bytes(limit));
    let d = placeholder_data(&classic());

    let mut stages = Vec::new();
    let err = e
        .compose_poster_with_progress(&ComposeRequest::new("classic", &photo, &d), |s, _| {
            stages.push(s)
        })
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_INPUT");
    assert!(err.to_string().contains("exceeds byte limit"), "{err}");
    assert_eq!(stages, vec![ComposeStage::LoadingTemplate]);

    let e = engine(EngineOpts::default().with_max_image_bytes(photo.len() as u64));
    assert!(e.decode_photo(&photo).is_ok());
}

#[test]
fn oversized_photos_are_bounded_by_the_largest_slot() {
    let t = classic();
    let big = decode_image(&png(3000, 1500)).unwrap();
    let bounded = bound_photo(big, &t);
    // Largest classic slot is 600 px, so the short side is capped at 1200.
    assert_eq!((bounded.width(), bounded.height()), (2400, 1200));

    let small = decode_image(&png(100, 100)).unwrap();
    assert_eq!(bound_photo(small, &t).width(), 100);
}

#[test]
fn engine_defaults_to_configured_strictness() {
    let opts = EngineOpts::default().with_strict_fonts(true).with_system_fonts(false);
    let engine = PosterEngine::new(
        Arc::new(FontRegistry::new()),
        Arc::new(TemplateRegistry::with_bundled().unwrap()),
        opts,
    );
    let d = placeholder_data(&classic());
    let photo = png(20, 20);
    let err = engine
        .compose_poster(&ComposeRequest::new("classic", &photo, &d))
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_INPUT");
    assert!(err.to_string().contains("not registered"));
}
