//! Landscape scene: one image at a time, warped and trailed, stepping forward on every kick.

use std::path::Path;
use std::sync::Arc;

use crate::composite::feedback::{CompositeInputs, FeedbackCompositor};
use crate::composite::transition::Transition;
use crate::control::message::ControlCommand;
use crate::deform::mesh::DeformParams;
use crate::deform::noise::NoiseField;
use crate::engine::FrameContext;
use crate::foundation::core::{Point, Rgb8, Rgba8Premul};
use crate::foundation::error::EngineResult;
use crate::mapping::remap::{decay, hsb_to_rgb, note_to_hue, relax_toward, remap_clamped};
use crate::render::mesh_paint::MeshPainter;
use crate::render::surface::Surface;
use crate::render::text::{FontFace, TextEngine};
use crate::render::vector::VectorPass;
use crate::scene::router::{Scene, SceneKind, SceneOutput};

/// Erosion added by each kick.
pub const EROSION_PULSE: f64 = 0.3;
/// Per-frame erosion decay factor.
pub const EROSION_RELAX: f64 = 0.95;
/// Per-frame wave decay factor.
pub const WAVE_RELAX: f64 = 0.93;
/// Feedback decay rests here when not driven.
pub const DECAY_REST: f64 = 0.98;
/// Fraction of the gap to [`DECAY_REST`] closed per frame.
pub const DECAY_RELAX_RATE: f64 = 0.05;
/// Em size of the placeholder message in pixels.
const PLACEHOLDER_SIZE_PX: f32 = 24.0;

/// Reactive parameters of the landscape scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LandscapeParams {
    /// Opacity fraction of the current image.
    pub image_reveal: f64,
    /// Erosion level in `0..=1`.
    pub erosion_amount: f64,
    /// Blur radius before rounding.
    pub blur_amount: f64,
    /// Wave amplitude in pixels.
    pub wave_displacement: f64,
    /// Trail persistence.
    pub feedback_decay: f64,
    /// Switched on by the first kick and never off again.
    pub effects_enabled: bool,
    /// Master effect level in `0..=1`.
    pub global_intensity: f64,
    /// Multiply tint.
    pub tint: Rgb8,
}

impl Default for LandscapeParams {
    fn default() -> Self {
        Self {
            image_reveal: 1.0,
            erosion_amount: 0.0,
            blur_amount: 0.0,
            wave_displacement: 0.0,
            feedback_decay: DECAY_REST,
            effects_enabled: false,
            global_intensity: 0.0,
            tint: Rgb8::WHITE,
        }
    }
}

/// Landscape scene state.
pub struct LandscapeScene {
    params: LandscapeParams,
    current: usize,
    transition: Transition,
    compositor: FeedbackCompositor,
    painter: MeshPainter,
    noise: Arc<dyn NoiseField>,
    text: Option<TextEngine>,
}

impl std::fmt::Debug for LandscapeScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LandscapeScene")
            .field("params", &self.params)
            .field("current", &self.current)
            .field("transition", &self.transition)
            .field("painter", &self.painter)
            .finish_non_exhaustive()
    }
}

impl LandscapeScene {
    /// Scene drawing through a `cols`×`rows` mesh, crossfading with `transition`.
    pub fn new(noise: Arc<dyn NoiseField>, transition: Transition, cols: u32, rows: u32) -> Self {
        Self {
            params: LandscapeParams::default(),
            current: 0,
            transition,
            compositor: FeedbackCompositor::new(),
            painter: MeshPainter::with_resolution(Arc::clone(&noise), cols, rows),
            noise,
            text: None,
        }
    }

    /// Draw the placeholder message with `face` from now on.
    pub fn set_font(&mut self, face: &FontFace) -> EngineResult<()> {
        self.text = Some(TextEngine::new(face, PLACEHOLDER_SIZE_PX)?);
        Ok(())
    }

    /// Current reactive parameters.
    pub fn params(&self) -> &LandscapeParams {
        &self.params
    }

    /// Reactive parameters, mutably.
    pub fn params_mut(&mut self) -> &mut LandscapeParams {
        &mut self.params
    }

    /// Index of the image being shown.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Crossfade state.
    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    /// Frame and feedback buffers.
    pub fn compositor(&self) -> &FeedbackCompositor {
        &self.compositor
    }

    /// Mesh painter (and its cached meshes).
    pub fn painter(&self) -> &MeshPainter {
        &self.painter
    }

    /// Mesh displacement inputs for `time`; zero intensity while effects are off.
    pub fn deform_params(&self, time: f64) -> DeformParams {
        let p = &self.params;
        DeformParams {
            time,
            wave_amount: p.wave_displacement,
            erosion_amount: p.erosion_amount,
            effect_intensity: if p.effects_enabled {
                p.global_intensity
            } else {
                0.0
            },
        }
    }

    /// Message shown when there is nothing to draw.
    pub fn placeholder_text(dir: &Path) -> String {
        format!("LANDSCAPES\nPlace images in: {}", dir.display())
    }

    fn kick(&mut self, ctx: &FrameContext<'_>) {
        let count = ctx.images.len();
        if count > 0 {
            let previous = ctx.images.get(self.current).cloned();
            self.current = (self.current + 1) % count;
            self.transition.start(previous);
            tracing::info!(index = self.current, "kick: next landscape");
        }

        self.params.erosion_amount = (self.params.erosion_amount + EROSION_PULSE).clamp(0.0, 1.0);
        if !self.params.effects_enabled {
            self.params.effects_enabled = true;
            tracing::info!("landscape effects enabled");
        }
    }

    fn render_placeholder(
        &mut self,
        ctx: &FrameContext<'_>,
        out: &mut Surface,
    ) -> EngineResult<SceneOutput> {
        let message = Self::placeholder_text(ctx.images.dir());
        out.clear(Rgba8Premul::opaque_black());
        if let Some(text) = self.text.as_mut() {
            let size = text.block_size(&message);
            let center = ctx.canvas.center();
            let origin = Point::new(center.x - size.width * 0.5, center.y - size.height * 0.5);
            let mut pass = VectorPass::for_surface(out)?;
            text.draw_block(&mut pass, origin, &message, Rgb8::WHITE, 255.0);
            pass.composite_onto(out)?;
        }
        Ok(SceneOutput::Placeholder(message))
    }
}

impl Scene for LandscapeScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Landscape
    }

    fn apply_control(&mut self, cmd: ControlCommand, ctx: &mut FrameContext<'_>) {
        if cmd == ControlCommand::Kick {
            self.kick(ctx);
            return;
        }
        let p = &mut self.params;
        match cmd {
            ControlCommand::BassLevel(b) => {
                p.erosion_amount = remap_clamped(b, 0.0, 1.0, 0.0, 0.8);
                p.blur_amount = remap_clamped(b, 0.0, 1.0, 0.0, 15.0);
                p.global_intensity = remap_clamped(b, 0.0, 1.0, 0.0, 1.0);
            }
            ControlCommand::MelodyNote(n) => {
                p.image_reveal = remap_clamped(n, 0.0, 1.0, 0.3, 1.0);
                let saturation = remap_clamped(n, 0.0, 1.0, 0.0, 120.0);
                p.tint = hsb_to_rgb(note_to_hue(n), saturation, 255.0);
            }
            ControlCommand::Texture(t) => {
                p.wave_displacement = remap_clamped(t, 0.0, 1.0, 0.0, 30.0);
                p.feedback_decay = remap_clamped(t, 0.0, 1.0, 0.98, 0.85);
            }
            ControlCommand::Kick | ControlCommand::Contrast(_) => {}
        }
    }

    fn tick(&mut self, ctx: &mut FrameContext<'_>) {
        let p = &mut self.params;
        p.erosion_amount = decay(p.erosion_amount, EROSION_RELAX);
        p.wave_displacement = decay(p.wave_displacement, WAVE_RELAX);
        p.feedback_decay = relax_toward(p.feedback_decay, DECAY_REST, DECAY_RELAX_RATE);
        self.transition.advance(ctx.dt);
    }

    fn render(
        &mut self,
        ctx: &mut FrameContext<'_>,
        out: &mut Surface,
    ) -> EngineResult<SceneOutput> {
        let Some(current) = ctx.images.get(self.current) else {
            return self.render_placeholder(ctx, out);
        };

        let deform = self.deform_params(ctx.time);
        self.painter.set_params(deform);
        let p = &self.params;
        let inputs = CompositeInputs {
            current,
            transition: &self.transition,
            image_reveal: p.image_reveal,
            effects_enabled: p.effects_enabled,
            global_intensity: p.global_intensity,
            erosion_amount: p.erosion_amount,
            blur_amount: p.blur_amount,
            tint: p.tint,
            feedback_decay: p.feedback_decay,
            time: ctx.time,
        };
        self.compositor
            .render(&inputs, &mut self.painter, self.noise.as_ref(), out)?;
        Ok(SceneOutput::Rendered)
    }

    fn status_lines(&self) -> Vec<String> {
        let p = &self.params;
        vec![
            "SCENE: LANDSCAPES (1)".to_string(),
            format!("EFFECTS: {}", if p.effects_enabled { "ON" } else { "OFF" }),
            format!(
                "EROSION: {:.2} | REVEAL: {:.2}",
                p.erosion_amount, p.image_reveal
            ),
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/landscape.rs"]
mod tests;
