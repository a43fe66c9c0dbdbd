//! Engine state and the per-frame step.
//!
//! [`EngineState`] owns everything that lives across frames: both scenes, the image library,
//! the random source, the clock and the output surface. The frame driver hands it the control
//! messages that arrived since the last frame and gets back a [`FrameReport`]; errors from a
//! scene never escape [`EngineState::frame`].

use std::sync::Arc;

use crate::assets::images::ImageLibrary;
use crate::composite::transition::Transition;
use crate::config::EngineConfig;
use crate::control::message::{ControlMessage, InputEvent};
use crate::deform::noise::PerlinField;
use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rect, Rgb8};
use crate::foundation::error::{EngineError, EngineResult, FaultLog};
use crate::foundation::rng::Rng64;
use crate::render::surface::Surface;
use crate::render::text::{FontFace, TextEngine};
use crate::render::vector::VectorPass;
use crate::scene::dualism::DualismScene;
use crate::scene::landscape::LandscapeScene;
use crate::scene::router::{SceneKind, SceneOutput, SceneRouter};

/// Fault-log subsystem for output surface reallocation.
const OUTPUT_SUBSYSTEM: &str = "output";
/// Fault-log subsystem for the status overlay.
const OVERLAY_SUBSYSTEM: &str = "overlay";
/// Em size of the status overlay text in pixels.
const OVERLAY_SIZE_PX: f32 = 14.0;

/// Per-call view of engine state handed to scenes.
pub struct FrameContext<'a> {
    /// Output resolution.
    pub canvas: Canvas,
    /// Landscape images.
    pub images: &'a ImageLibrary,
    /// Shared random source.
    pub rng: &'a mut Rng64,
    /// Index of the frame being built.
    pub frame: FrameIndex,
    /// Engine time in seconds at the start of this frame.
    pub time: f64,
    /// Nominal seconds per frame.
    pub dt: f64,
}

/// Outcome of one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// The active scene drew normally.
    Rendered {
        /// Scene that drew.
        scene: SceneKind,
    },
    /// The active scene had nothing to show and drew a message.
    Placeholder {
        /// Scene that drew.
        scene: SceneKind,
        /// Text shown.
        message: String,
    },
    /// A subsystem failed; the frame may be incomplete.
    Degraded {
        /// Scene that was active.
        scene: SceneKind,
        /// Failure description.
        error: String,
    },
}

impl FrameStatus {
    /// Whether the frame hit a failure.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Summary of one [`EngineState::frame`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Index of the frame just produced.
    pub index: FrameIndex,
    /// What was drawn.
    pub status: FrameStatus,
    /// Messages that matched a known address.
    pub applied: usize,
    /// Messages ignored as unrecognized.
    pub ignored: usize,
}

/// Everything the frame loop owns.
#[derive(Debug)]
pub struct EngineState {
    config: EngineConfig,
    canvas: Canvas,
    fps: Fps,
    router: SceneRouter,
    images: ImageLibrary,
    rng: Rng64,
    frame: FrameIndex,
    time: f64,
    output: Surface,
    faults: FaultLog,
    overlay: Option<TextEngine>,
}

impl EngineState {
    /// Build the engine from a validated configuration and a loaded image library.
    pub fn new(config: EngineConfig, images: ImageLibrary) -> EngineResult<Self> {
        config.validate()?;
        let canvas = config.canvas();
        let fps = config.frame_rate()?;

        let mut rng = Rng64::new(config.seed);
        let noise = Arc::new(PerlinField::new(rng.next_u64()));
        let transition = Transition::new(config.transition_secs).with_curve(config.transition_curve);
        let mut landscape =
            LandscapeScene::new(noise, transition, config.mesh.cols, config.mesh.rows);
        let mut dualism = DualismScene::new(&config.words);
        let output = Surface::new(canvas.width, canvas.height)?;

        let overlay = match FontFace::resolve(config.font_path.as_deref())? {
            Some(face) => {
                landscape.set_font(&face)?;
                dualism.set_font(&face)?;
                tracing::info!(font = face.label(), "font loaded");
                if config.status_overlay {
                    Some(TextEngine::new(&face, OVERLAY_SIZE_PX)?)
                } else {
                    None
                }
            }
            None => {
                tracing::warn!("no font configured or found; text will not be drawn");
                None
            }
        };

        tracing::info!(
            width = canvas.width,
            height = canvas.height,
            fps = config.fps,
            images = images.len(),
            "engine ready"
        );
        Ok(Self {
            overlay,
            config,
            canvas,
            fps,
            router: SceneRouter::new(landscape, dualism),
            images,
            rng,
            frame: FrameIndex(0),
            time: 0.0,
            output,
            faults: FaultLog::default(),
        })
    }

    /// Configuration the engine was built from.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Output resolution.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Frame rate driving `dt`.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Scene router.
    pub fn router(&self) -> &SceneRouter {
        &self.router
    }

    /// Scene router, mutably.
    pub fn router_mut(&mut self) -> &mut SceneRouter {
        &mut self.router
    }

    /// Landscape images.
    pub fn images(&self) -> &ImageLibrary {
        &self.images
    }

    /// Index of the next frame to be produced.
    pub fn frame_index(&self) -> FrameIndex {
        self.frame
    }

    /// Engine time in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The last presented frame.
    pub fn output(&self) -> &Surface {
        &self.output
    }

    /// Subsystems currently flagged as failing.
    pub fn faults(&self) -> &FaultLog {
        &self.faults
    }

    /// Change the output resolution. On allocation failure the old output is kept.
    pub fn set_canvas(&mut self, canvas: Canvas) -> EngineResult<()> {
        if canvas.is_empty() {
            return Err(EngineError::validation("output width/height must be > 0"));
        }
        if canvas == self.canvas {
            return Ok(());
        }
        match Surface::new(canvas.width, canvas.height) {
            Ok(surface) => {
                self.output = surface;
                self.canvas = canvas;
                self.faults.clear(OUTPUT_SUBSYSTEM);
                tracing::info!(width = canvas.width, height = canvas.height, "output resized");
                Ok(())
            }
            Err(err) => {
                self.faults.report(OUTPUT_SUBSYSTEM, &err);
                Err(err)
            }
        }
    }

    /// Apply one control message to the active scene. Returns `false` for unknown addresses.
    pub fn apply_control(&mut self, msg: &ControlMessage) -> bool {
        let mut ctx = FrameContext {
            canvas: self.canvas,
            images: &self.images,
            rng: &mut self.rng,
            frame: self.frame,
            time: self.time,
            dt: self.fps.frame_duration_secs(),
        };
        self.router.dispatch(msg, &mut ctx)
    }

    /// Apply a key press or click.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        let mut ctx = FrameContext {
            canvas: self.canvas,
            images: &self.images,
            rng: &mut self.rng,
            frame: self.frame,
            time: self.time,
            dt: self.fps.frame_duration_secs(),
        };
        self.router.handle_input(event, &mut ctx)
    }

    /// Produce one frame: apply `messages` in order, advance the active scene, render.
    #[tracing::instrument(level = "debug", skip_all, fields(frame = self.frame.0))]
    pub fn frame(&mut self, messages: impl IntoIterator<Item = ControlMessage>) -> FrameReport {
        let (mut applied, mut ignored) = (0, 0);
        for msg in messages {
            if self.apply_control(&msg) {
                applied += 1;
            } else {
                ignored += 1;
            }
        }

        let scene = self.router.active();
        let mut ctx = FrameContext {
            canvas: self.canvas,
            images: &self.images,
            rng: &mut self.rng,
            frame: self.frame,
            time: self.time,
            dt: self.fps.frame_duration_secs(),
        };
        self.router.tick(&mut ctx);
        let result = self.router.render(&mut ctx, &mut self.output);

        let status = match result {
            Ok(SceneOutput::Rendered) => {
                self.recovered(scene);
                FrameStatus::Rendered { scene }
            }
            Ok(SceneOutput::Placeholder(message)) => {
                self.recovered(scene);
                FrameStatus::Placeholder { scene, message }
            }
            Err(err) => {
                self.faults.report(scene.as_str(), &err);
                FrameStatus::Degraded {
                    scene,
                    error: err.to_string(),
                }
            }
        };

        if let Some(text) = self.overlay.as_mut() {
            let lines = self.router.active_scene().status_lines();
            match draw_status(text, &mut self.output, &lines) {
                Ok(()) => self.faults.clear(OVERLAY_SUBSYSTEM),
                Err(err) => {
                    self.faults.report(OVERLAY_SUBSYSTEM, &err);
                }
            }
        }

        let report = FrameReport {
            index: self.frame,
            status,
            applied,
            ignored,
        };
        self.frame = self.frame.next();
        self.time += self.fps.frame_duration_secs();
        report
    }

    fn recovered(&mut self, scene: SceneKind) {
        if self.faults.is_degraded(scene.as_str()) {
            tracing::info!(%scene, "scene recovered");
            self.faults.clear(scene.as_str());
        }
    }
}

fn draw_status(text: &mut TextEngine, out: &mut Surface, lines: &[String]) -> EngineResult<()> {
    if lines.is_empty() {
        return Ok(());
    }
    let block = lines.join("\n");
    let size = text.block_size(&block);
    let pad = 10.0;
    let mut pass = VectorPass::for_surface(out)?;
    pass.fill_rect(
        Rect::new(pad, pad, pad * 3.0 + size.width, pad * 3.0 + size.height),
        Rgb8::BLACK,
        180.0,
    );
    text.draw_block(
        &mut pass,
        Point::new(pad * 2.0, pad * 2.0),
        &block,
        Rgb8::new(150, 150, 150),
        255.0,
    );
    pass.composite_onto(out)
}

#[cfg(test)]
#[path = "../tests/unit/engine.rs"]
mod tests;
