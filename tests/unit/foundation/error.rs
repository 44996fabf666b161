use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        HoldError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        HoldError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        HoldError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        HoldError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn render_error_names_the_frame() {
    let err = HoldError::render(FrameIndex(42), "gpu lost");
    let msg = err.to_string();
    assert!(msg.contains("frame 42"), "{msg}");
    assert!(msg.contains("gpu lost"), "{msg}");
    assert!(matches!(err, HoldError::Render { frame: FrameIndex(42), .. }));
}

#[test]
fn io_error_keeps_path_and_source() {
    let err = HoldError::io("/tmp/out/3.png", std::io::Error::other("disk full"));
    let msg = err.to_string();
    assert!(msg.contains("/tmp/out/3.png"), "{msg}");
    assert!(msg.contains("disk full"), "{msg}");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = HoldError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
