use super::*;

fn sample() -> SheetMetadata {
    SheetMetadata {
        canvas_width: 130,
        canvas_height: 130,
        tile_width: 64,
        tile_height: 64,
        columns: 2,
        rows: 2,
        padding: 2,
        sprites: vec![
            SpriteMetadata {
                name: "alpha".to_string(),
                x: 0,
                y: 0,
                width: 64,
                height: 64,
                index: 0,
            },
            SpriteMetadata {
                name: "beta".to_string(),
                x: 66,
                y: 0,
                width: 64,
                height: 64,
                index: 1,
            },
            SpriteMetadata {
                name: "gamma, the third".to_string(),
                x: 0,
                y: 66,
                width: 64,
                height: 64,
                index: 2,
            },
        ],
    }
}

#[test]
fn json_uses_external_field_names() {
    let v: serde_json::Value = serde_json::from_str(&sample().to_json_pretty().unwrap()).unwrap();
    assert_eq!(v["width"], 130);
    assert_eq!(v["cols"], 2);
    assert_eq!(v["tile_height"], 64);
    assert_eq!(v["sprites"][1]["x"], 66);
    assert_eq!(v["sprites"][2]["index"], 2);
    assert!(v.get("canvas_width").is_none());
}

#[test]
fn json_file_round_trip_preserves_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meta/sheet.json");
    let meta = sample();
    meta.write_json(&path).unwrap();

    let back = SheetMetadata::read_json(&path).unwrap();
    assert_eq!(back, meta);
    let names = back.sprites.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["alpha", "beta", "gamma, the third"]);
}

#[test]
fn csv_quotes_awkward_names() {
    let csv = sample().to_csv();
    let lines = csv.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "name,x,y,width,height,index");
    assert_eq!(lines[2], "beta,66,0,64,64,1");
    assert_eq!(lines[3], "\"gamma, the third\",0,66,64,64,2");
    assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
}

#[test]
fn validate_accepts_sample_and_rejects_defects() {
    sample().validate().unwrap();

    let mut m = sample();
    m.sprites[1].x = 100;
    assert!(m.validate().unwrap_err().to_string().contains("beyond"));

    let mut m = sample();
    m.sprites[2].index = 0;
    assert!(m.validate().unwrap_err().to_string().contains("duplicate"));

    let mut m = sample();
    m.sprites[0].name.clear();
    assert!(m.validate().is_err());

    let mut m = sample();
    m.sprites.clear();
    assert!(m.validate().is_err());
}

#[test]
fn lookups() {
    let m = sample();
    assert_eq!(m.sprite_by_name("beta").map(|s| s.index), Some(1));
    assert!(m.sprite_by_name("delta").is_none());
    assert_eq!(m.sprite_by_index(2).map(|s| s.y), Some(66));
    assert!(m.sprite_by_index(3).is_none());
}

#[test]
fn format_from_extension() {
    assert_eq!(MetaFormat::from_path(Path::new("a/b.JSON")), Some(MetaFormat::Json));
    assert_eq!(MetaFormat::from_path(Path::new("b.csv")), Some(MetaFormat::Csv));
    assert_eq!(MetaFormat::from_path(Path::new("b.txt")), None);
    assert_eq!(MetaFormat::from_path(Path::new("noext")), None);
}

#[test]
fn malformed_json_is_serde_error() {
    assert!(matches!(
        SheetMetadata::from_json("{\"width\": 1"),
        Err(SpriteError::Serde(_))
    ));
}
