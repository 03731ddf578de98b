use proptest::prelude::*;

use super::*;

#[test]
fn column_hint_fixes_columns() {
    let l = compute_layout(7, 64, 64, 0, 3, 0).unwrap();
    assert_eq!((l.columns, l.rows), (3, 3));
    assert_eq!((l.canvas_width, l.canvas_height), (192, 192));
}

#[test]
fn row_hint_fixes_rows() {
    let l = compute_layout(7, 10, 20, 1, 0, 2).unwrap();
    assert_eq!((l.columns, l.rows), (4, 2));
    assert_eq!((l.canvas_width, l.canvas_height), (4 * 10 + 3, 2 * 20 + 1));
}

#[test]
fn no_hint_is_near_square() {
    let l = compute_layout(9, 16, 16, 0, 0, 0).unwrap();
    assert_eq!((l.columns, l.rows), (3, 3));

    let l = compute_layout(10, 16, 16, 0, 0, 0).unwrap();
    assert_eq!((l.columns, l.rows), (4, 3));

    let l = compute_layout(1, 16, 16, 5, 0, 0).unwrap();
    assert_eq!((l.columns, l.rows), (1, 1));
    assert_eq!((l.canvas_width, l.canvas_height), (16, 16));
}

#[test]
fn cell_origin_is_row_major_with_padding() {
    let l = compute_layout(3, 64, 64, 2, 2, 0).unwrap();
    assert_eq!(l.cell_origin(0), (0, 0));
    assert_eq!(l.cell_origin(1), (66, 0));
    assert_eq!(l.cell_origin(2), (0, 66));
    assert_eq!(l.capacity(), 4);
}

#[test]
fn rejects_bad_input() {
    assert!(matches!(
        compute_layout(0, 64, 64, 0, 0, 0),
        Err(SpriteError::EmptyInput(_))
    ));
    assert!(matches!(
        compute_layout(3, 0, 64, 0, 0, 0),
        Err(SpriteError::Configuration(_))
    ));
    assert!(matches!(
        compute_layout(3, 64, 64, 0, 2, 2),
        Err(SpriteError::Configuration(_))
    ));
}

#[test]
fn spec_helper_forwards() {
    let spec = LayoutSpec {
        tile_width: 8,
        tile_height: 8,
        padding: 0,
        columns: 0,
        rows: 1,
    };
    let l = spec.compute(5).unwrap();
    assert_eq!((l.columns, l.rows), (5, 1));
}

proptest! {
    #[test]
    fn grid_always_holds_every_tile(n in 1usize..500, cols in 0u32..20, pad in 0u32..5) {
        let l = compute_layout(n, 8, 8, pad, cols, 0).unwrap();
        prop_assert!(l.capacity() >= n as u64);
        // No fully empty trailing row.
        prop_assert!(u64::from(l.rows - 1) * u64::from(l.columns) < n as u64);
        prop_assert_eq!(l.canvas_width, l.columns * 8 + (l.columns - 1) * pad);
    }
}
