//! Engine configuration.
//!
//! Every field has a default so a partial JSON file (or none at all) is valid input; the CLI
//! overrides individual fields after loading.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::composite::transition::FadeCurve;
use crate::control::osc::{DEFAULT_BIND, DEFAULT_QUEUE_CAPACITY};
use crate::deform::mesh::{DEFAULT_COLS, DEFAULT_ROWS};
use crate::entity::word::FADE_THRESHOLD;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{EngineError, EngineResult};

/// Deformation grid resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeshConfig {
    /// Columns of grid cells.
    pub cols: u32,
    /// Rows of grid cells.
    pub rows: u32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
        }
    }
}

/// Word lifetimes and text rendering.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WordConfig {
    /// Fraction of lifetime below which words fade.
    pub fade_threshold: f64,
    /// Lifetime of words spawned in pairs, in frames.
    pub pair_lifetime: f64,
    /// Lifetime of words spawned by a click, in frames.
    pub click_lifetime: f64,
    /// Em size of word text in pixels at scale 1.
    pub font_size: f64,
}

impl Default for WordConfig {
    fn default() -> Self {
        Self {
            fade_threshold: FADE_THRESHOLD,
            pair_lifetime: 360.0,
            click_lifetime: 150.0,
            font_size: 72.0,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Target frame rate.
    pub fps: u32,
    /// UDP address the OSC receiver binds.
    pub osc_bind: String,
    /// Control queue backlog at which the receiver starts logging warnings.
    pub queue_capacity: usize,
    /// Directory scanned for landscape images.
    pub landscapes_dir: PathBuf,
    /// Seed for every random choice and the noise permutation.
    pub seed: u64,
    /// Deformation grid.
    pub mesh: MeshConfig,
    /// Image crossfade duration in seconds.
    pub transition_secs: f64,
    /// Curve applied to crossfade progress.
    pub transition_curve: FadeCurve,
    /// Word lifecycle settings.
    pub words: WordConfig,
    /// Write every Nth frame when presenting to PNG (0 disables snapshots).
    pub snapshot_every: u64,
    /// Draw scene status text in the top-left corner.
    pub status_overlay: bool,
    /// TrueType/OpenType font for all text; a system sans-serif face when unset.
    pub font_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 60,
            osc_bind: DEFAULT_BIND.to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            landscapes_dir: PathBuf::from("landscapes"),
            seed: 0,
            mesh: MeshConfig::default(),
            transition_secs: 1.5,
            transition_curve: FadeCurve::Linear,
            words: WordConfig::default(),
            snapshot_every: 60,
            status_overlay: false,
            font_path: None,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let cfg: Self = serde_json::from_str(json).context("parse engine config JSON")?;
        Ok(cfg)
    }

    /// Read and parse a JSON file.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read engine config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> EngineResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::validation("output width/height must be > 0"));
        }
        if self.fps == 0 {
            return Err(EngineError::validation("fps must be > 0"));
        }
        if self.mesh.cols == 0 || self.mesh.rows == 0 {
            return Err(EngineError::validation("mesh cols/rows must be > 0"));
        }
        if self.queue_capacity == 0 {
            return Err(EngineError::validation("queue_capacity must be > 0"));
        }
        if !self.transition_secs.is_finite() || self.transition_secs < 0.0 {
            return Err(EngineError::validation(
                "transition_secs must be finite and >= 0",
            ));
        }
        let w = &self.words;
        if !(w.fade_threshold.is_finite() && w.fade_threshold > 0.0 && w.fade_threshold <= 1.0) {
            return Err(EngineError::validation(
                "words.fade_threshold must be in (0, 1]",
            ));
        }
        for (name, v) in [
            ("words.pair_lifetime", w.pair_lifetime),
            ("words.click_lifetime", w.click_lifetime),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(EngineError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if !w.font_size.is_finite() || w.font_size <= 0.0 {
            return Err(EngineError::validation("words.font_size must be > 0"));
        }
        Ok(())
    }

    /// Output resolution.
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Frame rate as a rational.
    pub fn frame_rate(&self) -> EngineResult<Fps> {
        Fps::new(self.fps, 1)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
