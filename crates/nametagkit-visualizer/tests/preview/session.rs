use nametagkit_core::{NameString, MAX_NAME_LENGTH};
use nametagkit_designer::{GlyphSourceKind, TagDimensions};
use nametagkit_visualizer::PreviewSession;

fn name(text: &str) -> NameString {
    NameString::parse(text, MAX_NAME_LENGTH).unwrap()
}

#[test]
fn test_load_name_frames_model() {
    let mut session = PreviewSession::default();
    assert!(session.model().is_none());

    session.load_name(&name("ALICE")).unwrap();
    let model = session.model().unwrap();
    assert_eq!(model.name.as_str(), "ALICE");
    assert!(model.triangle_count() > 0);

    let (min, max) = model.bounds();
    let centre = (min + max) * 0.5;
    assert!((session.camera.target - centre).length() < 1e-4);
    assert!((max.z - 8.0).abs() < 1e-4);
}

#[test]
fn test_render_is_stable() {
    let mut session = PreviewSession::default();
    session.load_name(&name("BOB")).unwrap();
    let first = session.render_svg(640, 480);
    let second = session.render_svg(640, 480);
    assert_eq!(first, second);
    assert!(first.contains(r#"width="640""#));
}

#[test]
fn test_reset_view_undoes_orbit() {
    let mut session = PreviewSession::default();
    session.load_name(&name("EVE")).unwrap();
    let framed = session.camera;

    session.camera.orbit(1.0, 0.3);
    session.camera.zoom(20.0);
    assert_ne!(session.camera, framed);

    session.reset_view();
    assert_eq!(session.camera, framed);
}

#[test]
fn test_missing_font_falls_back_to_baked() {
    let session = PreviewSession::with_font(
        TagDimensions::default(),
        Some("No Such Font Family 1234"),
    );
    assert_eq!(session.glyph_source(), GlyphSourceKind::Baked);
}

#[test]
fn test_sessions_are_independent() {
    let mut a = PreviewSession::default();
    let b = PreviewSession::default();
    a.load_name(&name("ZED")).unwrap();
    a.toggle_auto_rotate();
    assert!(b.model().is_none());
    assert!(!b.is_auto_rotating());
}
