use super::*;
use crate::foundation::core::Rgba8Premul;

#[test]
fn small_amount_is_identity() {
    let mut s = Surface::new(2, 2).unwrap();
    s.data_mut()[0..4].copy_from_slice(&[255, 255, 255, 255]);
    let before = s.clone();
    blur_amount(&mut s, 0.9).unwrap();
    assert_eq!(s, before);
    blur_amount(&mut s, f64::NAN).unwrap();
    assert_eq!(s, before);
}

#[test]
fn constant_image_is_unchanged() {
    let color = Rgba8Premul {
        r: 10,
        g: 20,
        b: 30,
        a: 40,
    };
    let mut s = Surface::filled(5, 4, color).unwrap();
    let before = s.clone();
    blur_in_place(&mut s, 3, 2.0).unwrap();
    assert_eq!(s, before);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let mut s = Surface::new(5, 5).unwrap();
    let center = (2 * 5 + 2) * 4;
    s.data_mut()[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);
    blur_amount(&mut s, 2.0).unwrap();

    let nonzero = s.data().chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);
    let sum_a: i32 = s.data().chunks_exact(4).map(|px| i32::from(px[3])).sum();
    assert!((sum_a - 255).abs() <= 6);
}

#[test]
fn kernel_sums_to_one_in_q16() {
    for radius in [1, 4, 15] {
        let k = gaussian_kernel_q16(radius, sigma_for_radius(radius)).unwrap();
        assert_eq!(k.len(), (2 * radius + 1) as usize);
        assert_eq!(k.iter().map(|&w| u64::from(w)).sum::<u64>(), 65536);
    }
}

#[test]
fn invalid_sigma_is_rejected() {
    assert!(gaussian_kernel_q16(2, 0.0).is_err());
    assert!(gaussian_kernel_q16(2, f32::NAN).is_err());
}
