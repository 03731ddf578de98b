use super::*;
use crate::sheet::layout::compute_layout;

fn solid(name: &str, w: u32, h: u32, px: [u8; 4]) -> TileEntry {
    TileEntry::new(name, RasterImage::from_pixel(w, h, image::Rgba(px)))
}

#[test]
fn three_tiles_two_columns_with_padding() {
    let layout = compute_layout(3, 64, 64, 2, 2, 0).unwrap();
    let tiles = vec![
        solid("a", 64, 64, [255, 0, 0, 255]),
        solid("b", 64, 64, [0, 255, 0, 255]),
        solid("c", 64, 64, [0, 0, 255, 128]),
    ];
    let (sheet, meta) = compose(tiles, &layout).unwrap();

    assert_eq!(sheet.dimensions(), (130, 130));
    let origins = meta.sprites.iter().map(|s| (s.x, s.y)).collect::<Vec<_>>();
    assert_eq!(origins, [(0, 0), (66, 0), (0, 66)]);
    for s in &meta.sprites {
        assert!(s.x + s.width <= meta.canvas_width);
        assert!(s.y + s.height <= meta.canvas_height);
    }
    meta.validate().unwrap();

    assert_eq!(sheet.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(sheet.get_pixel(66, 0).0, [0, 255, 0, 255]);
    // Drawn onto transparency, the half-transparent tile keeps its exact pixels.
    assert_eq!(sheet.get_pixel(10, 100).0, [0, 0, 255, 128]);
    // Padding gutter and the unused fourth cell stay transparent.
    assert_eq!(sheet.get_pixel(65, 10).0[3], 0);
    assert_eq!(sheet.get_pixel(100, 100).0[3], 0);
}

#[test]
fn metadata_keeps_names_and_ordinals() {
    let layout = compute_layout(2, 4, 4, 0, 0, 0).unwrap();
    let (_, meta) = compose(
        vec![solid("first", 4, 4, [1, 2, 3, 4]), solid("second", 4, 4, [5, 6, 7, 8])],
        &layout,
    )
    .unwrap();
    assert_eq!(meta.sprites[0].name, "first");
    assert_eq!(meta.sprites[1].name, "second");
    assert_eq!(meta.sprites[1].index, 1);
    assert_eq!((meta.columns, meta.rows), (2, 1));
}

#[test]
fn wrong_tile_size_is_reported_with_its_index() {
    let layout = compute_layout(2, 8, 8, 0, 0, 0).unwrap();
    let err = compose(
        vec![solid("ok", 8, 8, [0; 4]), solid("bad", 8, 9, [0; 4])],
        &layout,
    )
    .unwrap_err();
    match err {
        SpriteError::TileSizeMismatch { index, got, want } => {
            assert_eq!(index, 1);
            assert_eq!(got, (8, 9));
            assert_eq!(want, (8, 8));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_and_overfull_inputs_are_rejected() {
    let layout = compute_layout(1, 8, 8, 0, 0, 0).unwrap();
    assert!(matches!(compose(Vec::new(), &layout), Err(SpriteError::EmptyInput(_))));

    let tiles = vec![solid("a", 8, 8, [0; 4]), solid("b", 8, 8, [0; 4])];
    assert!(matches!(compose(tiles, &layout), Err(SpriteError::Configuration(_))));
}
