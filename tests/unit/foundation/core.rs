use super::*;

#[test]
fn fps_frame_duration_matches_rate() {
    let fps = Fps::new(60, 1).unwrap();
    assert!((fps.frame_duration_secs() - 1.0 / 60.0).abs() < 1e-12);
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(60, 0).is_err());
}

#[test]
fn canvas_rect_and_center() {
    let c = Canvas::new(200, 100);
    assert_eq!(c.rect(), Rect::new(0.0, 0.0, 200.0, 100.0));
    assert_eq!(c.center(), Point::new(100.0, 50.0));
    assert!(Canvas::new(0, 10).is_empty());
}

#[test]
fn cover_rect_fills_and_centers() {
    let c = Canvas::new(200, 100);
    // Wider content: full height, overflow left/right.
    let r = c.cover_rect(kurbo::Size::new(400.0, 100.0));
    assert_eq!(r, Rect::new(-100.0, 0.0, 300.0, 100.0));
    // Taller content: full width, overflow top/bottom.
    let r = c.cover_rect(kurbo::Size::new(100.0, 100.0));
    assert_eq!(r, Rect::new(0.0, -50.0, 200.0, 150.0));
    // Degenerate content falls back to the canvas.
    assert_eq!(c.cover_rect(kurbo::Size::ZERO), c.rect());
}

#[test]
fn rgb_saturation_uses_hsb_scale() {
    assert_eq!(Rgb8::WHITE.saturation(), 0.0);
    assert_eq!(Rgb8::BLACK.saturation(), 0.0);
    assert_eq!(Rgb8::new(255, 0, 0).saturation(), 255.0);
}

#[test]
fn rgb_with_alpha_premultiplies() {
    let c = Rgb8::new(255, 100, 0).with_alpha(127.6);
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.b, 0);
}
