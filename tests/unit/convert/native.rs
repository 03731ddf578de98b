use super::*;

const SQUARE: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10" viewBox="0 0 20 10">
  <rect x="0" y="0" width="20" height="10" fill="#ff0000"/>
</svg>"##;

#[test]
fn renders_at_intrinsic_size() {
    let mut b = ResvgBackend::new(ConversionRequest::intrinsic());
    let img = b.convert_to_image(SQUARE).unwrap();
    assert_eq!(img.dimensions(), (20, 10));
    assert_eq!(img.get_pixel(10, 5).0, [255, 0, 0, 255]);
}

#[test]
fn scale_and_width_only_follow_shared_resolution() {
    let mut b = ResvgBackend::new(ConversionRequest::scaled(2.0).unwrap());
    assert_eq!(b.convert_to_image(SQUARE).unwrap().dimensions(), (40, 20));

    let mut b = ResvgBackend::new(ConversionRequest::new(0.0, 8, 0).unwrap());
    assert_eq!(b.convert_to_image(SQUARE).unwrap().dimensions(), (8, 4));
    assert_eq!(b.target_size(SQUARE).unwrap(), (8, 4));
}

#[test]
fn output_is_straight_alpha() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4">
  <rect width="4" height="4" fill="#ff0000" fill-opacity="0.5"/>
</svg>"##;
    let mut b = ResvgBackend::new(ConversionRequest::intrinsic());
    let px = b.convert_to_image(svg).unwrap().get_pixel(1, 1).0;
    assert!(px[0] >= 250, "red channel should be demultiplied, got {px:?}");
    assert!((120..=135).contains(&px[3]), "alpha {px:?}");
}

#[test]
fn probe_uses_parsed_tree_then_text_fallback() {
    let b = ResvgBackend::new(ConversionRequest::intrinsic());
    assert_eq!(b.probe_intrinsic_size(SQUARE), (20.0, 10.0));
    assert_eq!(b.probe_intrinsic_size(b"not svg at all"), (100.0, 100.0));
}

#[test]
fn view_box_wins_over_width_and_height() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100" viewBox="0 0 50 50">
  <rect width="50" height="50" fill="#0000ff"/>
</svg>"##;
    let mut b = ResvgBackend::new(ConversionRequest::intrinsic());
    assert_eq!(b.probe_intrinsic_size(svg), probe::probe_intrinsic_size(svg));
    assert_eq!(b.probe_intrinsic_size(svg), (50.0, 50.0));
    assert_eq!(b.target_size(svg).unwrap(), (50, 50));
    assert_eq!(b.convert_to_image(svg).unwrap().dimensions(), (50, 50));
}

#[test]
fn malformed_markup_is_a_conversion_error() {
    let mut b = ResvgBackend::new(ConversionRequest::intrinsic());
    let err = b.convert_to_image(b"<svg").unwrap_err();
    assert!(matches!(err, SpriteError::Conversion(_)), "{err}");
}

#[test]
fn oversized_raster_is_rejected() {
    let mut b = ResvgBackend::new(ConversionRequest::sized(MAX_RASTER_SIDE + 1, 1).unwrap());
    let err = b.convert_to_image(SQUARE).unwrap_err();
    assert!(err.to_string().contains("too large"), "{err}");
}

#[test]
fn convert_file_writes_png_and_creates_parent() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.svg");
    std::fs::write(&input, SQUARE).unwrap();
    let output = dir.path().join("nested/out.png");

    let mut b = ResvgBackend::new(ConversionRequest::intrinsic());
    b.convert_file(&input, &output).unwrap();
    let img = image::open(&output).unwrap();
    assert_eq!((img.width(), img.height()), (20, 10));
    b.close().unwrap();
    b.close().unwrap();
}

#[test]
fn missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut b = ResvgBackend::new(ConversionRequest::intrinsic());
    let err = b
        .convert_file(&dir.path().join("nope.svg"), &dir.path().join("o.png"))
        .unwrap_err();
    assert!(matches!(err, SpriteError::Io { .. }), "{err}");
}
