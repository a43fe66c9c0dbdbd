use crate::foundation::core::{Point, Rgb8};
use crate::mapping::remap::remap_clamped;

/// Fraction of the initial lifetime below which a word starts fading out.
pub const FADE_THRESHOLD: f64 = 0.3;

/// Fully visible opacity.
pub const OPACITY_MAX: f64 = 255.0;

/// Generative-typography parameters consumed when a word is drawn letter by letter.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Typography {
    /// Whole-word rotation in degrees.
    pub rotation_deg: f64,
    /// Extra spacing between letters, in font units.
    pub letter_spacing: f64,
    /// Phase offset of the per-letter vertical wave, in radians.
    pub wave_phase: f64,
    /// Random jitter strength, `0..=1`.
    pub glitch: f64,
    /// Radial dispersion distance in font units.
    pub disperse: f64,
    /// Stack letters vertically instead of along the baseline.
    pub vertical: bool,
}

/// An ephemeral on-screen word with its own fade/trigger lifecycle.
///
/// Opacity is derived from `remaining / initial` on every [`Word::update`]; scale is left
/// untouched between triggers (no per-frame damping).
#[derive(Clone, Debug, PartialEq)]
pub struct Word {
    text: String,
    /// Anchor position in pixels (the word is centered horizontally on it).
    pub position: Point,
    /// Base color.
    pub color: Rgb8,
    /// Current scale factor.
    pub scale: f64,
    /// Typography parameters.
    pub style: Typography,
    opacity: f64,
    remaining: f64,
    initial: f64,
    fade_threshold: f64,
}

impl Word {
    /// Create a word with `lifetime` frames to live.
    ///
    /// A zero, negative or non-finite lifetime produces a word that is already dead.
    pub fn new(
        text: impl Into<String>,
        position: Point,
        scale: f64,
        color: Rgb8,
        lifetime: f64,
    ) -> Self {
        let initial = if lifetime.is_finite() {
            lifetime.max(0.0)
        } else {
            0.0
        };
        Self {
            text: text.into(),
            position,
            color,
            scale,
            style: Typography::default(),
            opacity: if initial > 0.0 { OPACITY_MAX } else { 0.0 },
            remaining: initial,
            initial,
            fade_threshold: FADE_THRESHOLD,
        }
    }

    /// Override the fade threshold (fraction of lifetime, clamped to `(0, 1]`).
    pub fn with_fade_threshold(mut self, threshold: f64) -> Self {
        if threshold.is_finite() && threshold > 0.0 {
            self.fade_threshold = threshold.min(1.0);
        }
        self
    }

    /// Text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current opacity in `0..=255`.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Frames left before the word is fully faded.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Lifetime given at creation.
    pub fn initial(&self) -> f64 {
        self.initial
    }

    /// Advance one frame.
    pub fn update(&mut self) {
        self.remaining = (self.remaining - 1.0).max(0.0);
        if self.initial <= 0.0 {
            self.opacity = 0.0;
            return;
        }

        let life = self.remaining / self.initial;
        self.opacity = if life >= self.fade_threshold {
            OPACITY_MAX
        } else {
            remap_clamped(life, 0.0, self.fade_threshold, 0.0, OPACITY_MAX)
        };
    }

    /// Whether the word has faded out completely.
    pub fn is_dead(&self) -> bool {
        self.opacity <= 0.0
    }

    /// Restart the lifecycle at a new scale without respawning.
    pub fn trigger(&mut self, new_scale: f64) {
        self.scale = new_scale;
        self.remaining = self.initial;
        self.opacity = OPACITY_MAX;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/entity/word.rs"]
mod tests;
