use super::*;

#[test]
fn clamped_remap_bounds_output() {
    assert_eq!(remap(-1.0, 0.0, 1.0, 0.0, 255.0, true), 0.0);
    assert_eq!(remap(2.0, 0.0, 1.0, 0.0, 255.0, true), 255.0);
    assert_eq!(remap(0.5, 0.0, 1.0, 0.0, 255.0, true), 127.5);
}

#[test]
fn clamped_remap_is_monotonic() {
    let mut prev = f64::NEG_INFINITY;
    for i in -20..=40 {
        let v = f64::from(i) * 0.05;
        let out = remap(v, 0.0, 1.0, 0.0, 255.0, true);
        assert!(out >= prev);
        prev = out;
    }
}

#[test]
fn reversed_output_range_clamps_both_ways() {
    assert_eq!(remap_clamped(-5.0, 0.0, 1.0, 0.98, 0.85), 0.98);
    assert_eq!(remap_clamped(5.0, 0.0, 1.0, 0.98, 0.85), 0.85);
    let mid = remap_clamped(0.5, 0.0, 1.0, 0.98, 0.85);
    assert!((mid - 0.915).abs() < 1e-12);
}

#[test]
fn degenerate_input_range_returns_out_min() {
    for x in [-10.0, 0.0, 3.0, 1e9] {
        assert_eq!(remap(x, 2.0, 2.0, 7.0, 9.0, true), 7.0);
        assert_eq!(remap(x, 2.0, 2.0, 7.0, 9.0, false), 7.0);
    }
}

#[test]
fn unclamped_remap_extrapolates() {
    assert_eq!(remap(2.0, 0.0, 1.0, 0.0, 10.0, false), 20.0);
}

#[test]
fn nan_input_maps_to_out_min() {
    assert_eq!(remap_clamped(f64::NAN, 0.0, 1.0, 3.0, 4.0), 3.0);
}

#[test]
fn relax_and_decay_converge() {
    let mut v = 0.85;
    for _ in 0..200 {
        v = relax_toward(v, 0.98, 0.05);
    }
    assert!((v - 0.98).abs() < 1e-4);

    let mut e = 1.0;
    for _ in 0..200 {
        e = decay(e, 0.95);
    }
    assert!(e < 1e-4);
}

#[test]
fn note_to_hue_reads_midi_and_normalized() {
    assert_eq!(note_to_hue(0.5), 127.5);
    assert_eq!(note_to_hue(127.0), 255.0);
    assert_eq!(note_to_hue(1.0), 255.0);
}

#[test]
fn hsb_primary_colors() {
    assert_eq!(hsb_to_rgb(0.0, 255.0, 255.0), crate::Rgb8::new(255, 0, 0));
    assert_eq!(hsb_to_rgb(85.0, 255.0, 255.0), crate::Rgb8::new(0, 255, 0));
    assert_eq!(hsb_to_rgb(170.0, 255.0, 255.0), crate::Rgb8::new(0, 0, 255));
    assert_eq!(hsb_to_rgb(40.0, 0.0, 200.0), crate::Rgb8::new(200, 200, 200));
    assert_eq!(hsb_to_rgb(40.0, 255.0, 0.0), crate::Rgb8::BLACK);
}

#[test]
fn narrow_input_range_is_not_degenerate() {
    assert_eq!(remap(5e-18, 0.0, 1e-17, 0.0, 100.0, true), 50.0);
    assert_eq!(remap(1e-17, 0.0, 1e-17, 0.0, 100.0, true), 100.0);
}
