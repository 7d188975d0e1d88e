use super::*;

#[test]
fn bundled_templates_register_and_list_sorted() {
    let reg = TemplateRegistry::with_bundled().unwrap();
    let ids: Vec<String> = reg.list_templates().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["classic".to_owned(), "modern".to_owned()]);

    let classic = reg.load_template("classic").unwrap();
    assert_eq!((classic.canvas.width, classic.canvas.height), (1080, 1350));
    assert_eq!(classic.text.len(), 4);
}

#[test]
fn missing_template_is_not_found() {
    let reg = TemplateRegistry::new();
    let err = reg.load_template("nope").unwrap_err();
    assert_eq!(err.code(), "TEMPLATE_NOT_FOUND");
    assert_eq!(err.status(), 404);
}

#[test]
fn re_registration_replaces() {
    let reg = TemplateRegistry::with_bundled().unwrap();
    let mut t = (*reg.load_template("classic").unwrap()).clone();
    t.name = "Classic v2".into();
    reg.register_template(t).unwrap();

    let listed = reg.list_templates();
    let classic: Vec<&TemplateSummary> = listed.iter().filter(|s| s.id == "classic").collect();
    assert_eq!(classic.len(), 1);
    assert_eq!(classic[0].name, "Classic v2");
}

#[test]
fn invalid_template_is_rejected_and_not_stored() {
    let reg = TemplateRegistry::with_bundled().unwrap();
    let mut t = (*reg.load_template("classic").unwrap()).clone();
    t.id = "broken".into();
    t.canvas.width = 0;
    let err = reg.register_template(t).unwrap_err();
    assert_eq!(err.code(), "TEMPLATE_VALIDATION_ERROR");
    assert!(reg.load_template("broken").is_err());
}

#[test]
fn register_from_file() {
    let reg = TemplateRegistry::new();
    let path = std::env::temp_dir().join(format!("podium-template-{}.json", std::process::id()));
    let mut v: serde_json::Value = serde_json::from_str(BUNDLED_TEMPLATES[0].1).unwrap();
    v["id"] = serde_json::json!("from-disk");
    std::fs::write(&path, serde_json::to_string(&v).unwrap()).unwrap();

    assert_eq!(reg.register_template_file(&path).unwrap(), "from-disk");
    assert!(reg.load_template("from-disk").is_ok());
    let _ = std::fs::remove_file(path);

    assert_eq!(
        reg.register_template_file("/nonexistent/podium.json")
            .unwrap_err()
            .code(),
        "INVALID_INPUT"
    );
}

#[test]
fn clear_empties() {
    let reg = TemplateRegistry::with_bundled().unwrap();
    reg.clear_templates();
    assert!(reg.list_templates().is_empty());
}
