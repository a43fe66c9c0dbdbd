use super::*;
use crate::entity::word::Typography;

struct Mono;

impl GlyphMetrics for Mono {
    fn glyph_size(&self, _ch: char) -> Size {
        Size::new(10.0, 20.0)
    }
}

fn word(text: &str, style: Typography) -> Word {
    let mut w = Word::new(text, Point::new(100.0, 50.0), 2.0, Rgb8::WHITE, 60.0);
    w.style = style;
    w
}

#[test]
fn plain_word_is_centered_on_baseline() {
    let w = word("ABCD", Typography::default());
    let layout = layout_word(&w, &Mono, 0.0, &mut Rng64::new(1));
    let xs: Vec<f64> = layout.glyphs.iter().map(|g| g.origin.x).collect();
    assert_eq!(xs, [-20.0, -10.0, 0.0, 10.0]);
    assert_eq!(layout.alpha, 255.0);
    for (i, g) in layout.glyphs.iter().enumerate() {
        let expected = (i as f64 * 0.3).sin() * 3.0;
        assert!((g.origin.y - expected).abs() < 1e-12);
        assert_eq!(g.color, Rgb8::WHITE);
    }
}

#[test]
fn transform_translates_and_scales() {
    let w = word("A", Typography::default());
    let layout = layout_word(&w, &Mono, 0.0, &mut Rng64::new(1));
    let p = layout.transform * Point::new(1.0, 1.0);
    assert_eq!(p, Point::new(102.0, 52.0));
}

#[test]
fn letter_spacing_widens_advance() {
    let style = Typography {
        letter_spacing: 4.0,
        ..Typography::default()
    };
    let w = word("AB", style);
    let layout = layout_word(&w, &Mono, 0.0, &mut Rng64::new(1));
    assert_eq!(layout.glyphs[1].origin.x - layout.glyphs[0].origin.x, 14.0);
}

#[test]
fn vertical_layout_stacks_letters() {
    let style = Typography {
        vertical: true,
        ..Typography::default()
    };
    let w = word("ABC", style);
    let layout = layout_word(&w, &Mono, 0.0, &mut Rng64::new(1));
    for (i, g) in layout.glyphs.iter().enumerate() {
        assert_eq!(g.origin.x, -5.0);
        assert_eq!(g.origin.y, -15.0 + i as f64 * 25.0);
    }
}

#[test]
fn dispersion_spreads_letters_around_a_circle() {
    let style = Typography {
        disperse: 50.0,
        ..Typography::default()
    };
    let w = word("AB", style);
    let layout = layout_word(&w, &Mono, 0.0, &mut Rng64::new(1));
    // First letter at angle 0, last at 2π: both pushed +50 along x.
    assert!((layout.glyphs[0].origin.x - (-10.0 + 50.0)).abs() < 1e-9);
    assert!((layout.glyphs[1].origin.x - (0.0 + 50.0)).abs() < 1e-9);
}

#[test]
fn single_letter_dispersion_does_not_divide_by_zero() {
    let style = Typography {
        disperse: 50.0,
        ..Typography::default()
    };
    let w = word("A", style);
    let layout = layout_word(&w, &Mono, 0.0, &mut Rng64::new(1));
    assert!(layout.glyphs[0].origin.x.is_finite());
}

#[test]
fn glitch_is_deterministic_for_a_seed() {
    let style = Typography {
        glitch: 0.8,
        ..Typography::default()
    };
    let w = word("GLITCH", style);
    let a = layout_word(&w, &Mono, 1.0, &mut Rng64::new(9));
    let b = layout_word(&w, &Mono, 1.0, &mut Rng64::new(9));
    assert_eq!(a, b);
    let plain = layout_word(&word("GLITCH", Typography::default()), &Mono, 1.0, &mut Rng64::new(9));
    assert_ne!(a.glyphs, plain.glyphs);
}

#[test]
fn small_rotation_is_ignored() {
    let style = Typography {
        rotation_deg: 0.05,
        ..Typography::default()
    };
    let w = word("A", style);
    let layout = layout_word(&w, &Mono, 0.0, &mut Rng64::new(1));
    let p = layout.transform * Point::new(1.0, 0.0);
    assert_eq!(p, Point::new(102.0, 50.0));
}

#[test]
fn non_positive_scale_draws_at_unit_scale() {
    let mut w = word("A", Typography::default());
    w.scale = 0.0;
    let layout = layout_word(&w, &Mono, 0.0, &mut Rng64::new(1));
    assert_eq!(layout.transform * Point::new(1.0, 0.0), Point::new(101.0, 50.0));
}

#[test]
fn multibyte_text_lays_out_per_char() {
    let w = word("MELODÍA", Typography::default());
    let layout = layout_word(&w, &Mono, 0.0, &mut Rng64::new(1));
    assert_eq!(layout.glyphs.len(), 7);
    assert_eq!(layout.glyphs[5].ch, 'Í');
}
