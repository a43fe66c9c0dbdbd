//! Fixed-rate frame driver and frame presentation.
//!
//! One thread owns the [`EngineState`]. Each tick drains the control queue without blocking,
//! produces one frame and hands it to a [`FramePresenter`]. A slow frame pushes the next
//! deadline back instead of skipping work.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context as _;

use crate::control::message::{ControlMessage, InputEvent};
use crate::control::osc::ControlQueue;
use crate::engine::{EngineState, FrameReport};
use crate::foundation::core::{Fps, Point};
use crate::foundation::error::{EngineError, EngineResult, FaultLog};
use crate::render::surface::Surface;

/// Receives every produced frame.
pub trait FramePresenter {
    /// Present `frame`, described by `report`.
    fn present(&mut self, report: &FrameReport, frame: &Surface) -> EngineResult<()>;
}

/// Discards frames, counting them.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter {
    presented: u64,
}

impl NullPresenter {
    /// Frames received so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl FramePresenter for NullPresenter {
    fn present(&mut self, _report: &FrameReport, _frame: &Surface) -> EngineResult<()> {
        self.presented += 1;
        Ok(())
    }
}

/// Writes every Nth frame to `<dir>/frame_NNNNNN.png`.
#[derive(Clone, Debug)]
pub struct PngSnapshotPresenter {
    dir: PathBuf,
    every: u64,
    written: Vec<PathBuf>,
}

impl PngSnapshotPresenter {
    /// Presenter writing into `dir` (created if missing); `every == 0` writes nothing.
    pub fn new(dir: impl Into<PathBuf>, every: u64) -> EngineResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create snapshot dir '{}'", dir.display()))?;
        Ok(Self {
            dir,
            every,
            written: Vec::new(),
        })
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FramePresenter for PngSnapshotPresenter {
    fn present(&mut self, report: &FrameReport, frame: &Surface) -> EngineResult<()> {
        if self.every == 0 || report.index.0 % self.every != 0 {
            return Ok(());
        }
        let path = self.dir.join(format!("frame_{:06}.png", report.index.0));
        write_png(frame, &path)?;
        tracing::debug!(path = %path.display(), "snapshot written");
        self.written.push(path);
        Ok(())
    }
}

/// Encode `frame` as a straight-alpha PNG, creating parent directories.
pub fn write_png(frame: &Surface, path: &Path) -> EngineResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let img = frame.to_rgba_image()?;
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Totals from one [`FrameLoop::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames produced.
    pub frames: u64,
    /// Frames whose status was degraded.
    pub degraded_frames: u64,
    /// Frames that finished after their deadline.
    pub late_frames: u64,
    /// Control messages that matched a known address.
    pub messages_applied: u64,
    /// Control messages ignored as unrecognized.
    pub messages_ignored: u64,
    /// Presenter calls that failed.
    pub presenter_errors: u64,
}

/// Fixed-rate driver.
#[derive(Debug)]
pub struct FrameLoop {
    frame_duration: Duration,
    paced: bool,
    max_frames: Option<u64>,
    stop: Arc<AtomicBool>,
}

impl FrameLoop {
    /// Loop targeting `fps`, running until stopped.
    pub fn new(fps: Fps) -> Self {
        Self {
            frame_duration: fps.frame_duration(),
            paced: true,
            max_frames: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop after `frames` frames (`None` runs until the stop flag is set).
    pub fn with_max_frames(mut self, frames: Option<u64>) -> Self {
        self.max_frames = frames;
        self
    }

    /// Disable sleeping between frames (offline rendering).
    pub fn with_pacing(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }

    /// Flag that ends the loop after the current frame when set.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Run until the frame limit or the stop flag. Per-frame failures are logged, not returned.
    pub fn run(
        &self,
        engine: &mut EngineState,
        queue: &ControlQueue,
        presenter: &mut dyn FramePresenter,
    ) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut faults = FaultLog::default();
        let mut deadline = Instant::now();

        while !self.stop.load(Ordering::Relaxed)
            && self.max_frames.is_none_or(|max| summary.frames < max)
        {
            let report = engine.frame(queue.drain());
            summary.frames += 1;
            summary.messages_applied += report.applied as u64;
            summary.messages_ignored += report.ignored as u64;
            if report.status.is_degraded() {
                summary.degraded_frames += 1;
            }

            match presenter.present(&report, engine.output()) {
                Ok(()) => faults.clear("presenter"),
                Err(err) => {
                    summary.presenter_errors += 1;
                    faults.report("presenter", &err);
                }
            }

            if !self.paced {
                continue;
            }
            deadline += self.frame_duration;
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            } else {
                summary.late_frames += 1;
                deadline = now;
            }
        }

        tracing::info!(
            frames = summary.frames,
            degraded = summary.degraded_frames,
            late = summary.late_frames,
            "frame loop stopped"
        );
        summary
    }
}

/// One scripted input.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptAction {
    /// A control message, as if received over OSC.
    Message(ControlMessage),
    /// A key press.
    Key(char),
    /// A pointer click at `[x, y]`.
    Click([f64; 2]),
}

/// A [`ScriptAction`] applied just before frame `frame` is produced.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScriptEvent {
    /// Frame index the action lands on.
    pub frame: u64,
    /// What happens.
    #[serde(flatten)]
    pub action: ScriptAction,
}

/// Offline session: a frame count and timed inputs, replayed without pacing.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameScript {
    /// Frames to produce.
    pub frames: u64,
    /// Inputs; events on the same frame apply in list order.
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

impl FrameScript {
    /// Parse a JSON script.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let script: Self = serde_json::from_str(json).context("parse frame script JSON")?;
        script.validate()?;
        Ok(script)
    }

    /// Read and parse a JSON script file.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read frame script '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Reject empty scripts and events past the last frame.
    pub fn validate(&self) -> EngineResult<()> {
        if self.frames == 0 {
            return Err(EngineError::validation("script frames must be > 0"));
        }
        if let Some(ev) = self.events.iter().find(|ev| ev.frame >= self.frames) {
            return Err(EngineError::validation(format!(
                "script event at frame {} is past the last frame ({})",
                ev.frame,
                self.frames - 1
            )));
        }
        Ok(())
    }

    /// Produce every frame, presenting each one. Returns the report of the last frame.
    pub fn play(
        &self,
        engine: &mut EngineState,
        presenter: &mut dyn FramePresenter,
    ) -> EngineResult<Option<FrameReport>> {
        self.validate()?;
        let mut last = None;
        for frame in 0..self.frames {
            for ev in self.events.iter().filter(|ev| ev.frame == frame) {
                match &ev.action {
                    ScriptAction::Message(msg) => engine.apply_control(msg),
                    ScriptAction::Key(key) => engine.handle_input(InputEvent::Key(*key)),
                    ScriptAction::Click([x, y]) => {
                        engine.handle_input(InputEvent::Click(Point::new(*x, *y)))
                    }
                };
            }
            let report = engine.frame(Vec::<ControlMessage>::new());
            presenter.present(&report, engine.output())?;
            last = Some(report);
        }
        Ok(last)
    }
}

#[cfg(test)]
#[path = "../tests/unit/runtime.rs"]
mod tests;
