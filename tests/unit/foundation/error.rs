use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SpriteError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        SpriteError::conversion("x")
            .to_string()
            .contains("conversion error:")
    );
    assert!(
        SpriteError::empty_input("x")
            .to_string()
            .contains("empty input:")
    );
    assert!(
        SpriteError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn structured_variants_render_their_fields() {
    let err = SpriteError::TileSizeMismatch {
        index: 3,
        got: (10, 12),
        want: (64, 64),
    };
    assert_eq!(err.to_string(), "tile 3 is 10x12, expected 64x64");

    let err = SpriteError::UnavailableBackend {
        backend: "inkscape".to_string(),
        reason: "not on PATH".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "backend 'inkscape' is not available: not on PATH"
    );

    assert_eq!(
        SpriteError::invalid_dimension(0, 5).to_string(),
        "invalid dimensions: 0x5"
    );
}

#[test]
fn io_keeps_path_and_source() {
    let err = SpriteError::io("a/b.svg", std::io::Error::other("boom"));
    let text = err.to_string();
    assert!(text.contains("a/b.svg"));
    assert!(text.contains("boom"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn helpers_build_their_variants() {
    assert!(matches!(SpriteError::configuration("x"), SpriteError::Configuration(_)));
    assert!(matches!(SpriteError::conversion("x"), SpriteError::Conversion(_)));
    assert!(matches!(SpriteError::empty_input("x"), SpriteError::EmptyInput(_)));
    assert!(matches!(SpriteError::serde("x"), SpriteError::Serde(_)));
}
