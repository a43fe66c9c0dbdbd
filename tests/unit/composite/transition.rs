use super::*;
use crate::foundation::core::Rgba8Premul;

fn img() -> ImageHandle {
    ImageHandle::solid(0, "prev", 1, 1, Rgba8Premul::opaque_black()).unwrap()
}

#[test]
fn new_transition_is_idle() {
    let mut t = Transition::new(1.5);
    assert!(!t.is_active());
    t.advance(1.0);
    assert_eq!(t.progress(), 0.0);
}

#[test]
fn completes_after_duration_at_60fps() {
    let mut t = Transition::new(1.5);
    t.start(Some(img()));
    for _ in 0..89 {
        t.advance(1.0 / 60.0);
        assert!(t.is_active());
        assert!(t.progress() < 1.0);
    }
    t.advance(1.0 / 60.0);
    assert_eq!(t.progress(), 1.0);
    assert!(!t.is_active());
    assert!(t.previous().is_none());

    t.advance(1.0);
    assert_eq!(t.progress(), 1.0);
}

#[test]
fn progress_never_exceeds_one() {
    let mut t = Transition::new(0.5);
    t.start(Some(img()));
    t.advance(10.0);
    assert_eq!(t.progress(), 1.0);
}

#[test]
fn outgoing_alpha_fades_from_full_to_zero() {
    let mut t = Transition::new(1.0);
    t.start(None);
    assert_eq!(t.outgoing_alpha(), 255.0);
    t.advance(0.5);
    assert!((t.outgoing_alpha() - 127.5).abs() < 1e-9);
    t.advance(0.5);
    assert_eq!(t.outgoing_alpha(), 0.0);
}

#[test]
fn restart_resets_progress() {
    let mut t = Transition::new(1.0);
    t.start(Some(img()));
    t.advance(0.7);
    t.start(Some(img()));
    assert_eq!(t.progress(), 0.0);
    assert!(t.is_active());
    assert!(t.previous().is_some());
}

#[test]
fn zero_duration_completes_on_first_tick() {
    let mut t = Transition::new(0.0);
    t.start(Some(img()));
    t.advance(0.0);
    assert!(!t.is_active());
}

#[test]
fn fade_curves_share_endpoints_and_differ_between() {
    for c in [FadeCurve::Linear, FadeCurve::Smoothstep, FadeCurve::InOutCubic] {
        assert_eq!(c.shape(0.0), 0.0);
        assert!((c.shape(1.0) - 1.0).abs() < 1e-12);
        assert!((c.shape(0.5) - 0.5).abs() < 1e-12);
        assert_eq!(c.shape(-2.0), 0.0);
        assert_eq!(c.shape(f64::NAN), 0.0);
    }
    assert!(FadeCurve::Smoothstep.shape(0.25) < 0.25);
    assert!(FadeCurve::InOutCubic.shape(0.25) < FadeCurve::Smoothstep.shape(0.25));
}

#[test]
fn curved_transition_holds_outgoing_image_longer() {
    let mut linear = Transition::new(1.0);
    let mut cubic = Transition::new(1.0).with_curve(FadeCurve::InOutCubic);
    linear.start(None);
    cubic.start(None);
    linear.advance(0.25);
    cubic.advance(0.25);
    assert!((linear.outgoing_alpha() - 191.25).abs() < 1e-9);
    assert!(cubic.outgoing_alpha() > linear.outgoing_alpha());
}
