use super::*;

#[test]
fn width_and_height_attributes() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="32"></svg>"#;
    assert_eq!(probe_intrinsic_size(svg), (48.0, 32.0));
}

#[test]
fn view_box_is_preferred_over_width_height() {
    let svg = br#"<svg width="48px" height="48px" viewBox="0 0 24 12"></svg>"#;
    assert_eq!(probe_intrinsic_size(svg), (24.0, 12.0));

    let commas = br#"<svg viewBox="0,0,30,20"></svg>"#;
    assert_eq!(probe_intrinsic_size(commas), (30.0, 20.0));
}

#[test]
fn unit_suffixes_are_stripped() {
    assert_eq!(parse_length("12px"), Some(12.0));
    assert_eq!(parse_length("12pt"), Some(12.0));
    assert_eq!(parse_length("1.5em"), Some(1.5));
    assert_eq!(parse_length("2rem"), Some(2.0));
    assert_eq!(parse_length(" 7 "), Some(7.0));
    assert_eq!(parse_length("50%"), None);
    assert_eq!(parse_length("0"), None);
}

#[test]
fn missing_or_bad_sides_fall_back_independently() {
    let svg = br#"<svg width="40" height="auto"></svg>"#;
    assert_eq!(probe_intrinsic_size(svg), (40.0, FALLBACK_SIDE));

    let svg = br#"<svg viewBox="0 0 nope 3" height="9"></svg>"#;
    assert_eq!(probe_intrinsic_size(svg), (FALLBACK_SIDE, 9.0));

    assert_eq!(probe_intrinsic_size(b"not svg at all"), (100.0, 100.0));
    assert_eq!(probe_intrinsic_size(b""), (100.0, 100.0));
}

#[test]
fn only_root_tag_attributes_are_considered() {
    let svg = br#"<?xml version="1.0"?>
<!-- width="999" -->
<!DOCTYPE svg>
<svg xmlns="http://www.w3.org/2000/svg" height="20"
     width="10"><rect stroke-width="3" width="500" height="600"/></svg>"#;
    assert_eq!(probe_intrinsic_size(svg), (10.0, 20.0));
}

#[test]
fn quoted_gt_inside_attribute_does_not_end_the_tag() {
    let svg = br#"<svg data-x='a>b' width='16' height='8'></svg>"#;
    assert_eq!(probe_intrinsic_size(svg), (16.0, 8.0));
}

#[test]
fn prefixed_root_element_is_recognized() {
    let svg = br#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" width="5" height="6"/>"#;
    assert_eq!(probe_intrinsic_size(svg), (5.0, 6.0));
}

#[test]
fn non_svg_root_or_malformed_markup_falls_back() {
    let html = br#"<html width="5" height="6"><svg width="7" height="8"/></html>"#;
    assert_eq!(probe_intrinsic_size(html), (FALLBACK_SIDE, FALLBACK_SIDE));

    let unclosed = br#"<svg width="12" height="12"><g></svg>"#;
    assert_eq!(probe_intrinsic_size(unclosed), (FALLBACK_SIDE, FALLBACK_SIDE));
}

#[test]
fn root_view_box_reports_only_a_valid_box() {
    let svg = br#"<svg width="200" height="100" viewBox="0 0 50 50"></svg>"#;
    assert_eq!(root_view_box(svg), Some((50.0, 50.0)));
    assert_eq!(root_view_box(br#"<svg width="3" height="4"/>"#), None);
    assert_eq!(root_view_box(br#"<svg viewBox="0 0 -1 4"/>"#), None);
}
