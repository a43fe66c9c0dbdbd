use crate::assets::images::ImageHandle;
use crate::mapping::remap::remap_clamped;

/// Progress this close to 1 counts as finished (absorbs frame-time rounding).
const COMPLETE_EPSILON: f64 = 1e-9;

/// Shape of the outgoing image's fade over transition progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeCurve {
    /// Opacity falls at a constant rate.
    #[default]
    Linear,
    /// Hermite smoothstep, soft at both ends.
    Smoothstep,
    /// Cubic in-out: holds the old image longer, then cuts faster through the middle.
    InOutCubic,
}

impl FadeCurve {
    /// Map linear progress to fade progress; both in `[0, 1]`.
    pub fn shape(self, t: f64) -> f64 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        match self {
            Self::Linear => t,
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
            Self::InOutCubic if t < 0.5 => 4.0 * t * t * t,
            Self::InOutCubic => 1.0 - (2.0 - 2.0 * t).powi(3) / 2.0,
        }
    }
}

/// Crossfade from the previously shown image to the current one.
#[derive(Clone, Debug)]
pub struct Transition {
    previous: Option<ImageHandle>,
    progress: f64,
    active: bool,
    duration_secs: f64,
    curve: FadeCurve,
}

impl Transition {
    /// Inactive transition that will run for `duration_secs` once started.
    pub fn new(duration_secs: f64) -> Self {
        Self {
            previous: None,
            progress: 0.0,
            active: false,
            duration_secs,
            curve: FadeCurve::Linear,
        }
    }

    /// Curve applied to progress when computing the outgoing opacity.
    pub fn with_curve(mut self, curve: FadeCurve) -> Self {
        self.curve = curve;
        self
    }

    /// Restart from zero, fading out `previous`.
    pub fn start(&mut self, previous: Option<ImageHandle>) {
        self.previous = previous;
        self.progress = 0.0;
        self.active = true;
    }

    /// Advance by `dt` seconds. Completing releases the previous image.
    pub fn advance(&mut self, dt: f64) {
        if !self.active {
            return;
        }
        let step = if self.duration_secs > 0.0 && self.duration_secs.is_finite() {
            dt.max(0.0) / self.duration_secs
        } else {
            1.0
        };
        if step.is_finite() {
            self.progress += step;
        }
        if self.progress >= 1.0 - COMPLETE_EPSILON {
            self.progress = 1.0;
            self.active = false;
            self.previous = None;
        }
    }

    /// Progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Whether the crossfade is still running.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Configured duration.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// The image being faded out, while active.
    pub fn previous(&self) -> Option<&ImageHandle> {
        self.previous.as_ref()
    }

    /// Opacity of the outgoing image, `255 → 0` over the transition.
    pub fn outgoing_alpha(&self) -> f64 {
        remap_clamped(self.curve.shape(self.progress), 0.0, 1.0, 255.0, 0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/transition.rs"]
mod tests;
