use super::*;
use crate::deform::noise::{ConstantField, PerlinField};
use crate::foundation::core::Rgba8Premul;

fn white(w: u32, h: u32) -> Surface {
    Surface::filled(w, h, Rgba8Premul::from_straight_rgba(255, 255, 255, 255)).unwrap()
}

#[test]
fn erosion_with_zero_strength_is_noop() {
    let mut s = white(48, 48);
    let before = s.clone();
    erosion_overlay(&mut s, 0.0, 1.0, &PerlinField::new(1)).unwrap();
    assert_eq!(s, before);
}

#[test]
fn erosion_skips_cells_with_low_noise() {
    let mut s = white(48, 48);
    let before = s.clone();
    erosion_overlay(&mut s, 1.0, 0.0, &ConstantField(0.2)).unwrap();
    assert_eq!(s, before);
}

#[test]
fn erosion_darkens_whole_cells() {
    let mut s = white(30, 30);
    erosion_overlay(&mut s, 0.5, 0.0, &ConstantField(1.0)).unwrap();
    let a = s.pixel(0, 0).unwrap();
    // Half strength at full noise: black at alpha 110 over white.
    assert!(a.r.abs_diff(145) <= 1, "{a:?}");
    // Cells are uniform, partial edge cells are clipped.
    assert_eq!(s.pixel(23, 23), Some(a));
    assert_eq!(s.pixel(29, 29), Some(a));
}

#[test]
fn tint_skips_desaturated_colors() {
    let mut s = white(4, 4);
    let before = s.clone();
    tint(&mut s, Rgb8::new(200, 200, 200), 1.0);
    assert_eq!(s, before);
}

#[test]
fn tint_multiplies_toward_color() {
    let mut s = white(2, 2);
    tint(&mut s, Rgb8::new(255, 0, 0), 1.0);
    let p = s.pixel(0, 0).unwrap();
    assert_eq!(p.r, 255);
    assert!(p.g < 255 && p.g > 0);
    assert_eq!(p.g, p.b);
    assert_eq!(p.a, 255);
}

#[test]
fn tint_scales_with_global_intensity() {
    let mut s = white(2, 2);
    let before = s.clone();
    tint(&mut s, Rgb8::new(255, 0, 0), 0.0);
    assert_eq!(s, before);
}

#[test]
fn vignette_darkens_corners_not_center() {
    let mut s = white(64, 64);
    vignette(&mut s, 1.0).unwrap();
    assert!(s.pixel(32, 32).unwrap().r >= 254);
    assert!(s.pixel(0, 0).unwrap().r < 150);
}

#[test]
fn vignette_grows_monotonically_toward_corners() {
    let mut s = white(64, 64);
    vignette(&mut s, 1.0).unwrap();
    let diagonal: Vec<u8> = (0..32).map(|i| s.pixel(i, i).unwrap().r).collect();
    assert!(diagonal.windows(2).all(|w| w[0] <= w[1]), "{diagonal:?}");
    let mut half = white(64, 64);
    vignette(&mut half, 0.5).unwrap();
    assert!(half.pixel(0, 0).unwrap().r > s.pixel(0, 0).unwrap().r);
}

#[test]
fn vignette_at_zero_intensity_is_noop() {
    let mut s = white(16, 16);
    let before = s.clone();
    vignette(&mut s, 0.0).unwrap();
    assert_eq!(s, before);
}
