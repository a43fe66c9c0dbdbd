//! Landscape frame composition with a decaying feedback trail.
//!
//! Two persistent buffers sized to the output: the frame buffer (re-rendered every frame) and
//! the feedback buffer (accumulates decayed copies of past frames). One call to
//! [`FeedbackCompositor::render`] runs the whole pass:
//!
//! 1. size both buffers to the output (reallocation clears frame to transparent, feedback to
//!    opaque black)
//! 2. draw the outgoing image of an active transition
//! 3. draw the current image at `imageReveal`
//! 4. blur, erosion, tint and vignette when effects are on
//! 5. present feedback underneath and the frame buffer on top
//! 6. decay the feedback buffer and accumulate the frame into it

use crate::assets::images::ImageHandle;
use crate::composite::effects;
use crate::composite::transition::Transition;
use crate::deform::noise::NoiseField;
use crate::foundation::core::{Canvas, Rgb8, Rgba8Premul};
use crate::foundation::error::{EngineError, EngineResult};
use crate::mapping::remap::remap_clamped;
use crate::render::blur;
use crate::render::mesh_paint::ContentPainter;
use crate::render::surface::Surface;

/// Effects run only above this global intensity.
pub const EFFECTS_MIN_INTENSITY: f64 = 0.01;
/// The feedback trail is shown only above this global intensity.
pub const FEEDBACK_MIN_INTENSITY: f64 = 0.02;

/// Everything one landscape pass reads.
#[derive(Clone, Copy, Debug)]
pub struct CompositeInputs<'a> {
    /// Image being shown.
    pub current: &'a ImageHandle,
    /// Crossfade state (its previous image is drawn while active).
    pub transition: &'a Transition,
    /// Fraction of full opacity for the current image.
    pub image_reveal: f64,
    /// Set by the first kick.
    pub effects_enabled: bool,
    /// Master effect level in `0..=1`.
    pub global_intensity: f64,
    /// Erosion level in `0..=1`.
    pub erosion_amount: f64,
    /// Blur radius before rounding.
    pub blur_amount: f64,
    /// Multiply tint color.
    pub tint: Rgb8,
    /// Trail persistence in `0.85..=0.99`.
    pub feedback_decay: f64,
    /// Scene time in seconds.
    pub time: f64,
}

/// Owner of the frame and feedback buffers.
#[derive(Debug, Default)]
pub struct FeedbackCompositor {
    frame: Option<Surface>,
    feedback: Option<Surface>,
}

impl FeedbackCompositor {
    /// Compositor with no buffers yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reallocate buffers whose size differs from `canvas`. Returns `true` if any was replaced.
    pub fn ensure_buffers(&mut self, canvas: Canvas) -> EngineResult<bool> {
        if canvas.is_empty() {
            return Err(EngineError::render(format!(
                "cannot composite into a {}x{} output",
                canvas.width, canvas.height
            )));
        }
        let mut changed = false;
        if !self.frame.as_ref().is_some_and(|s| s.matches(canvas)) {
            self.frame = None;
            self.frame = Some(Surface::new(canvas.width, canvas.height)?);
            changed = true;
        }
        if !self.feedback.as_ref().is_some_and(|s| s.matches(canvas)) {
            self.feedback = None;
            self.feedback = Some(Surface::filled(
                canvas.width,
                canvas.height,
                Rgba8Premul::opaque_black(),
            )?);
            changed = true;
        }
        if changed {
            tracing::debug!(
                width = canvas.width,
                height = canvas.height,
                "compositor buffers allocated"
            );
        }
        Ok(changed)
    }

    /// Whether the feedback buffer exists (trails can be drawn).
    pub fn feedback_initialized(&self) -> bool {
        self.feedback.is_some()
    }

    /// The frame buffer from the last pass.
    pub fn frame(&self) -> Option<&Surface> {
        self.frame.as_ref()
    }

    /// The accumulated feedback buffer.
    pub fn feedback(&self) -> Option<&Surface> {
        self.feedback.as_ref()
    }

    /// Render one landscape frame into `out` (which must match the output size).
    pub fn render(
        &mut self,
        inputs: &CompositeInputs<'_>,
        painter: &mut dyn ContentPainter,
        noise: &dyn NoiseField,
        out: &mut Surface,
    ) -> EngineResult<()> {
        let canvas = out.canvas();
        self.ensure_buffers(canvas)?;
        let (Some(frame), Some(feedback)) = (self.frame.as_mut(), self.feedback.as_mut()) else {
            return Err(EngineError::render("compositor buffers missing"));
        };

        frame.clear(Rgba8Premul::transparent());

        let transition = inputs.transition;
        if transition.is_active()
            && let Some(previous) = transition.previous()
        {
            let alpha = transition.outgoing_alpha();
            painter.paint(
                previous,
                canvas.cover_rect(previous.size()),
                (alpha / 255.0) as f32,
                frame,
            )?;
        }

        let reveal = (255.0 * inputs.image_reveal).clamp(0.0, 255.0);
        painter.paint(
            inputs.current,
            canvas.cover_rect(inputs.current.size()),
            (reveal / 255.0) as f32,
            frame,
        )?;

        let gi = inputs.global_intensity;
        if inputs.effects_enabled && gi > EFFECTS_MIN_INTENSITY {
            blur::blur_amount(frame, inputs.blur_amount)?;
            effects::erosion_overlay(frame, inputs.erosion_amount * gi, inputs.time, noise)?;
            effects::tint(frame, inputs.tint, gi);
            effects::vignette(frame, gi)?;
        }

        out.clear(Rgba8Premul::opaque_black());
        if gi > FEEDBACK_MIN_INTENSITY {
            let trail = remap_clamped(gi, 0.0, 1.0, 0.0, 160.0);
            out.draw_over(feedback, (trail / 255.0) as f32)?;
        }
        out.draw_over(frame, 1.0)?;

        let darken = remap_clamped(inputs.feedback_decay, 0.85, 0.99, 42.0, 6.0);
        feedback.fill_over(Rgb8::BLACK.with_alpha(darken));
        feedback.draw_over(frame, 1.0)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/feedback.rs"]
mod tests;
