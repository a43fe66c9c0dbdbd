//! Letter-by-letter placement of a [`Word`].
//!
//! Layout only needs per-character extents, supplied through [`GlyphMetrics`]; shaping and
//! drawing live in [`crate::render::text`].

use std::f64::consts::TAU;

use kurbo::Size;

use crate::entity::word::Word;
use crate::foundation::core::{Affine, Point, Rgb8, Vec2};
use crate::foundation::rng::Rng64;
use crate::mapping::remap::remap_clamped;

/// Amplitude of the always-on vertical letter wave, in font units.
const WAVE_AMPLITUDE: f64 = 3.0;
/// Glitch jitter below this strength is ignored.
const GLITCH_MIN: f64 = 0.05;
/// Dispersion below this distance is ignored.
const DISPERSE_MIN: f64 = 5.0;
/// Rotations below this many degrees are ignored.
const ROTATION_MIN_DEG: f64 = 0.1;
/// Extra gap between vertically stacked letters.
const VERTICAL_GAP: f64 = 5.0;

/// Per-character extents of the font used to draw words, at scale 1.
pub trait GlyphMetrics {
    /// Advance width and line height of `ch`.
    fn glyph_size(&self, ch: char) -> Size;

    /// Width of the whole string's bounding box.
    fn text_width(&self, text: &str) -> f64 {
        text.chars().map(|c| self.glyph_size(c).width).sum()
    }
}

/// One letter positioned in word-local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphPlacement {
    /// The character.
    pub ch: char,
    /// Baseline-left origin in word-local units.
    pub origin: Point,
    /// Glyph extents from [`GlyphMetrics`].
    pub size: Size,
    /// Straight color of this letter.
    pub color: Rgb8,
}

/// Draw-ready layout of one word.
#[derive(Clone, Debug, PartialEq)]
pub struct WordLayout {
    /// Word-local to screen transform (position, scale, rotation).
    pub transform: Affine,
    /// Opacity in `0..=255`.
    pub alpha: f64,
    /// Letters in text order.
    pub glyphs: Vec<GlyphPlacement>,
}

/// Lay out `word` at `time` seconds.
///
/// Glitch jitter and glitch colors draw from `rng`, so a fixed seed gives a fixed layout.
pub fn layout_word(
    word: &Word,
    metrics: &dyn GlyphMetrics,
    time: f64,
    rng: &mut Rng64,
) -> WordLayout {
    let style = word.style;
    let scale = if word.scale > 0.0 { word.scale } else { 1.0 };

    let mut transform =
        Affine::translate(Vec2::new(word.position.x, word.position.y)) * Affine::scale(scale);
    if style.rotation_deg.abs() > ROTATION_MIN_DEG {
        transform *= Affine::rotate(style.rotation_deg.to_radians());
    }

    let text = word.text();
    let count = text.chars().count();
    let total_width = metrics.text_width(text);
    let mut pen_x = -total_width / 2.0;
    let mut glyphs = Vec::with_capacity(count);

    for (i, ch) in text.chars().enumerate() {
        let size = metrics.glyph_size(ch);
        let fi = i as f64;
        let mut x = pen_x;
        let mut y = 0.0;

        let phase = style.wave_phase + time * 2.0 + fi * 0.3;
        y += phase.sin() * WAVE_AMPLITUDE;

        let mut color = word.color;
        if style.glitch > GLITCH_MIN {
            x += rng.range(-style.glitch * 8.0, style.glitch * 8.0);
            y += rng.range(-style.glitch * 12.0, style.glitch * 12.0);
            if rng.next_f64_01() < style.glitch * 0.3 {
                color = Rgb8::from_f64(
                    rng.range(150.0, 255.0),
                    rng.range(100.0, 255.0),
                    rng.range(100.0, 255.0),
                );
            }
        }

        if style.disperse > DISPERSE_MIN {
            let angle = remap_clamped(fi, 0.0, count.saturating_sub(1) as f64, 0.0, TAU);
            x += angle.cos() * style.disperse;
            y += angle.sin() * style.disperse;
        }

        if style.vertical {
            x = -size.width / 2.0;
            y = -total_width / 2.0 + fi * (size.height + style.letter_spacing + VERTICAL_GAP);
        } else {
            pen_x += size.width + style.letter_spacing;
        }

        glyphs.push(GlyphPlacement {
            ch,
            origin: Point::new(x, y),
            size,
            color,
        });
    }

    WordLayout {
        transform,
        alpha: word.opacity(),
        glyphs,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/entity/typography.rs"]
mod tests;
