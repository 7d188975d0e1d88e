use super::*;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("podium-fonts-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn register_rejects_bad_arguments_as_invalid_input() {
    let reg = FontRegistry::new();
    assert_eq!(
        reg.register_font("", "a.ttf").unwrap_err().code(),
        "INVALID_INPUT"
    );
    assert_eq!(
        reg.register_font("Inter", "").unwrap_err().code(),
        "INVALID_INPUT"
    );
    assert_eq!(
        reg.register_font("Inter", "fonts/inter.woff2")
            .unwrap_err()
            .code(),
        "INVALID_INPUT"
    );
    assert!(reg.list_fonts().is_empty());
}

#[test]
fn register_missing_or_corrupt_file_is_font_load_error() {
    let reg = FontRegistry::new();
    let dir = scratch_dir("corrupt");

    let missing = dir.join("absent.ttf");
    assert_eq!(
        reg.register_font("Absent", &missing).unwrap_err().code(),
        "FONT_LOAD_ERROR"
    );

    let corrupt = dir.join("garbage.OTF");
    std::fs::write(&corrupt, b"definitely not a font").unwrap();
    assert_eq!(
        reg.register_font("Garbage", &corrupt).unwrap_err().code(),
        "FONT_LOAD_ERROR"
    );
    assert!(!reg.is_font_registered("Garbage"));
}

#[test]
fn bundled_init_accounts_for_every_font() {
    let reg = FontRegistry::new();
    let dir = scratch_dir("bundled-empty");
    std::fs::write(dir.join(BUNDLED_FONTS[0].1), b"corrupt bytes").unwrap();

    let report = reg.init_bundled_fonts(&dir);
    assert_eq!(
        report.loaded.len() + report.failed.len(),
        BUNDLED_FONTS.len()
    );
    assert!(report.loaded.is_empty());
    for f in &report.failed {
        assert!(!f.name.is_empty());
        assert!(!f.reason.is_empty());
    }
    assert!(report.failed[0].reason.contains("no parsable font face"));
    assert!(report.failed[1].reason.contains("not found"));
}

#[test]
fn bundled_init_from_package_dir_never_panics() {
    let reg = FontRegistry::new();
    let report = reg.init_bundled_fonts(crate::foundation::config::EngineOpts::default().fonts_dir());
    assert_eq!(
        report.loaded.len() + report.failed.len(),
        BUNDLED_FONTS.len()
    );
    assert_eq!(reg.list_fonts().len(), report.loaded.len());
}

#[test]
fn unregistered_family_falls_back_unless_strict() {
    let reg = FontRegistry::new();
    let book = reg.font_book(false);
    assert_eq!(book.resolve_family("Nope", false).unwrap(), DEFAULT_FONT);
    assert_eq!(
        book.resolve_family("Nope", true).unwrap_err().code(),
        "INVALID_INPUT"
    );
    assert_eq!(reg.default_font(), "sans-serif");
}

#[test]
fn clear_empties_the_registry() {
    let reg = FontRegistry::new();
    reg.clear_fonts();
    assert!(reg.list_fonts().is_empty());
    assert!(reg.get_font("Inter").is_none());
}
