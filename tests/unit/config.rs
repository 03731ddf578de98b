use super::*;

fn base() -> JobConfig {
    let mut cfg = JobConfig {
        input: PathBuf::from("icons"),
        output: PathBuf::from("out/sheet.png"),
        ..JobConfig::default()
    };
    cfg.apply_defaults();
    cfg
}

#[test]
fn defaults_follow_the_cli_tool() {
    let cfg = base();
    assert_eq!(cfg.scale, 1.0);
    assert_eq!(cfg.backend, "resvg");
    assert_eq!((cfg.tile_width, cfg.tile_height), (64, 64));
    assert_eq!((cfg.cols, cfg.rows), (8, 0));
    assert_eq!(cfg.sort, SortMode::Name);
    cfg.validate().unwrap();
}

#[test]
fn defaults_leave_explicit_values_alone() {
    let mut cfg = JobConfig {
        input: PathBuf::from("a.svg"),
        output: PathBuf::from("a.png"),
        width: 32,
        rows: 2,
        backend: "rsvg".to_string(),
        ..JobConfig::default()
    };
    cfg.apply_defaults();
    assert_eq!(cfg.scale, 0.0);
    assert_eq!((cfg.cols, cfg.rows), (0, 2));
    assert_eq!(cfg.backend, "rsvg");
    assert_eq!(cfg.conversion_request().unwrap().width(), Some(32));
}

#[test]
fn validation_rejects_contradictions_and_out_of_range() {
    let cases: Vec<(&str, Box<dyn Fn(&mut JobConfig)>)> = vec![
        ("input", Box::new(|c| c.input = PathBuf::new())),
        ("output", Box::new(|c| c.output = PathBuf::new())),
        ("both scale", Box::new(|c| c.width = 10)),
        ("non-negative", Box::new(|c| c.scale = -1.0)),
        ("cols and rows", Box::new(|c| c.rows = 2)),
        ("tile_width", Box::new(|c| c.tile_width = 4096)),
        ("tile_height", Box::new(|c| c.tile_height = 0)),
        ("cols", Box::new(|c| c.cols = 101)),
        ("padding", Box::new(|c| c.padding = 101)),
        ("threads", Box::new(|c| c.threads = Some(0))),
        ("extension", Box::new(|c| c.meta = Some(PathBuf::from("meta.txt")))),
    ];
    for (needle, mutate) in cases {
        let mut cfg = base();
        mutate(&mut cfg);
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, SpriteError::Configuration(_)), "{needle}: {err}");
        assert!(err.to_string().contains(needle), "{needle}: {err}");
    }
}

#[test]
fn boundaries_are_inclusive() {
    let mut cfg = base();
    cfg.tile_width = 2048;
    cfg.tile_height = 1;
    cfg.cols = 100;
    cfg.padding = 100;
    cfg.validate().unwrap();
}

#[test]
fn metadata_format_is_inferred_or_overridden() {
    let mut cfg = base();
    assert_eq!(cfg.metadata_target(), None);

    cfg.meta = Some(PathBuf::from("out/meta.CSV"));
    assert_eq!(
        cfg.metadata_target(),
        Some((PathBuf::from("out/meta.CSV"), MetaFormat::Csv))
    );

    cfg.meta_format = Some(MetaFormat::Json);
    assert_eq!(cfg.metadata_target().map(|(_, f)| f), Some(MetaFormat::Json));
}

#[test]
fn loads_json_with_defaults_for_missing_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.json");
    std::fs::write(
        &path,
        r#"{ "input": "icons", "output": "sheet.png", "rows": 3, "sort": "mtime", "fit": "fit", "meta": "sheet.json" }"#,
    )
    .unwrap();

    let mut cfg = JobConfig::from_path(&path).unwrap();
    cfg.apply_defaults();
    cfg.validate().unwrap();
    assert_eq!(cfg.rows, 3);
    assert_eq!(cfg.cols, 0);
    assert_eq!(cfg.sort, SortMode::Mtime);
    assert_eq!(cfg.fit, FitMode::Fit);
    assert_eq!(cfg.layout_spec().rows, 3);
}

#[test]
fn unknown_fields_and_bad_json_are_serde_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.json");
    std::fs::write(&path, r#"{ "input": "x", "colour": "red" }"#).unwrap();
    assert!(matches!(JobConfig::from_path(&path), Err(SpriteError::Serde(_))));

    assert!(matches!(
        JobConfig::from_path(&dir.path().join("missing.json")),
        Err(SpriteError::Io { .. })
    ));
}
