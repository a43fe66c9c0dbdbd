//! Word scene: opposing word pairs that appear on kicks, react to the music and fade out.

use std::f64::consts::TAU;

use crate::config::WordConfig;
use crate::control::message::{ControlCommand, ManualCommand};
use crate::engine::FrameContext;
use crate::entity::store::{EntityId, EntityStore};
use crate::entity::typography::layout_word;
use crate::foundation::core::{Canvas, Point, Rgb8};
use crate::foundation::error::EngineResult;
use crate::foundation::rng::Rng64;
use crate::mapping::remap::{hsb_to_rgb, note_to_hue, remap_clamped};
use crate::render::surface::Surface;
use crate::render::text::{FontFace, TextEngine, WORD_LETTER_SPACING};
use crate::render::vector::VectorPass;
use crate::scene::router::{Scene, SceneKind, SceneOutput};

/// Named group of opposing word pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DualitySet {
    /// Display name.
    pub name: &'static str,
    /// Left/right word pairs.
    pub pairs: [(&'static str, &'static str); 4],
}

/// The selectable pair sets (keys `3`, `4`, `5`).
pub const DUALITY_SETS: [DualitySet; 3] = [
    DualitySet {
        name: "philosophy",
        pairs: [
            ("CUERPO", "ALMA"),
            ("MUNDO SENSIBLE", "MUNDO INTELIGIBLE"),
            ("APARIENCIA", "ESENCIA"),
            ("DEVENIR", "SER"),
        ],
    },
    DualitySet {
        name: "music",
        pairs: [
            ("RITMO", "MELODÍA"),
            ("GRAVE", "AGUDO"),
            ("TENSO", "RELAJADO"),
            ("STACCATO", "LEGATO"),
        ],
    },
    DualitySet {
        name: "texture",
        pairs: [
            ("DENSO", "DISPERSO"),
            ("ÁSPERO", "SUAVE"),
            ("OSCURO", "BRILLANTE"),
            ("CAOS", "ORDEN"),
        ],
    },
];

/// Color of the left word of a pair.
pub const LEFT_COLOR: Rgb8 = Rgb8::new(255, 100, 150);
/// Color of the right word of a pair.
pub const RIGHT_COLOR: Rgb8 = Rgb8::new(100, 150, 255);
/// Text spawned by a pointer click.
pub const CLICK_TEXT: &str = "CLICK";
/// Scale of clicked words.
pub const CLICK_SCALE: f64 = 1.8;
/// Color of clicked words.
pub const CLICK_COLOR: Rgb8 = Rgb8::new(255, 200, 100);
/// Background brightness at full bass.
const BACKGROUND_MAX: f64 = 80.0;

/// Reactive parameters of the word scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DualismParams {
    /// Opaque background color.
    pub background: Rgb8,
    /// Scale given to newly spawned and kick-triggered words.
    pub word_size_multiplier: f64,
    /// Degrees added to every word's rotation each frame.
    pub rotation_speed: f64,
    /// Index into [`DUALITY_SETS`].
    pub duality_set: usize,
}

impl Default for DualismParams {
    fn default() -> Self {
        Self {
            background: Rgb8::BLACK,
            word_size_multiplier: 1.0,
            rotation_speed: 0.0,
            duality_set: 0,
        }
    }
}

/// Word scene state.
#[derive(Debug)]
pub struct DualismScene {
    params: DualismParams,
    words: EntityStore,
    text: Option<TextEngine>,
    font_size: f64,
    pair_lifetime: f64,
    click_lifetime: f64,
}

impl Default for DualismScene {
    fn default() -> Self {
        Self::new(&WordConfig::default())
    }
}

impl DualismScene {
    /// Empty scene using the lifetimes and font size in `cfg`. Words are only drawn once a
    /// font is set.
    pub fn new(cfg: &WordConfig) -> Self {
        Self {
            params: DualismParams::default(),
            words: EntityStore::with_fade_threshold(cfg.fade_threshold),
            text: None,
            font_size: cfg.font_size,
            pair_lifetime: cfg.pair_lifetime,
            click_lifetime: cfg.click_lifetime,
        }
    }

    /// Draw words with `face` from now on.
    pub fn set_font(&mut self, face: &FontFace) -> EngineResult<()> {
        let text = TextEngine::new(face, self.font_size as f32)?
            .with_letter_spacing(WORD_LETTER_SPACING);
        self.text = Some(text);
        Ok(())
    }

    /// Word text engine, once a font is set.
    pub fn text_engine(&self) -> Option<&TextEngine> {
        self.text.as_ref()
    }

    /// Current reactive parameters.
    pub fn params(&self) -> &DualismParams {
        &self.params
    }

    /// Live words.
    pub fn words(&self) -> &EntityStore {
        &self.words
    }

    /// Live words, mutably.
    pub fn words_mut(&mut self) -> &mut EntityStore {
        &mut self.words
    }

    /// The active pair set.
    pub fn duality_set(&self) -> &DualitySet {
        DUALITY_SETS
            .get(self.params.duality_set)
            .unwrap_or(&DUALITY_SETS[0])
    }

    /// Choose a pair set. Out-of-range indices are ignored and return `false`.
    pub fn select_set(&mut self, index: usize) -> bool {
        let Some(set) = DUALITY_SETS.get(index) else {
            return false;
        };
        self.params.duality_set = index;
        tracing::info!(set = index, name = set.name, "duality set selected");
        true
    }

    /// Spawn a random pair from the active set: left word in the left band, right word in the
    /// right band, both on one random row.
    pub fn spawn_pair(&mut self, canvas: Canvas, rng: &mut Rng64) -> (EntityId, EntityId) {
        let set = self.duality_set();
        let (left, right) = set.pairs[rng.index(set.pairs.len()).unwrap_or(0)];
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        let x1 = rng.range(w * 0.1, w * 0.4);
        let x2 = rng.range(w * 0.6, w * 0.9);
        let y = rng.range(h * 0.2, h * 0.8);
        let scale = self.params.word_size_multiplier;

        let lifetime = self.pair_lifetime;
        let a = self.spawn_word(left, Point::new(x1, y), scale, LEFT_COLOR, lifetime, rng);
        let b = self.spawn_word(right, Point::new(x2, y), scale, RIGHT_COLOR, lifetime, rng);
        tracing::debug!(left, right, words = self.words.len(), "pair spawned");
        (a, b)
    }

    /// Spawn the click marker word at `at`.
    pub fn spawn_click(&mut self, at: Point, rng: &mut Rng64) -> EntityId {
        let lifetime = self.click_lifetime;
        self.spawn_word(CLICK_TEXT, at, CLICK_SCALE, CLICK_COLOR, lifetime, rng)
    }

    /// Insert a word with its own random letter-wave phase.
    fn spawn_word(
        &mut self,
        text: &str,
        at: Point,
        scale: f64,
        color: Rgb8,
        lifetime: f64,
        rng: &mut Rng64,
    ) -> EntityId {
        let id = self.words.spawn(text, at, scale, color, lifetime);
        if let Some(w) = self.words.get_mut(id) {
            w.style.wave_phase = rng.range(0.0, TAU);
        }
        id
    }

    /// Restart every word at a random scale in `[2, 3)`.
    pub fn retrigger_all(&mut self, rng: &mut Rng64) {
        self.words.trigger_all_with(|| 2.0 + rng.range(0.0, 1.0));
    }

    /// Remove every word.
    pub fn clear_words(&mut self) {
        self.words.clear();
        tracing::info!("words cleared");
    }

    fn kick(&mut self, ctx: &mut FrameContext<'_>) {
        self.spawn_pair(ctx.canvas, ctx.rng);
        let scale = self.params.word_size_multiplier;
        self.words.trigger_all_with(|| scale);
        tracing::info!(words = self.words.len(), "kick: new pair");
    }
}

impl Scene for DualismScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Dualism
    }

    fn apply_control(&mut self, cmd: ControlCommand, ctx: &mut FrameContext<'_>) {
        match cmd {
            ControlCommand::Kick => self.kick(ctx),
            ControlCommand::BassLevel(b) => {
                let bright = remap_clamped(b, 0.0, 1.0, 0.0, BACKGROUND_MAX);
                self.params.background = Rgb8::from_f64(bright * 0.8, bright * 0.4, bright);
                self.params.word_size_multiplier = remap_clamped(b, 0.0, 1.0, 0.8, 1.3);
                let rotation = remap_clamped(b, 0.0, 1.0, -30.0, 30.0);
                for (_, w) in self.words.iter_mut() {
                    w.style.rotation_deg = rotation;
                }
            }
            ControlCommand::MelodyNote(n) => {
                if self.words.is_empty() {
                    return;
                }
                let color = hsb_to_rgb(note_to_hue(n), 255.0, 255.0);
                if let Some(i) = ctx.rng.index(self.words.len())
                    && let Some(w) = self.words.nth_mut(i)
                {
                    w.color = color;
                }
                let disperse = remap_clamped(n, 0.0, 1.0, 0.0, 100.0);
                for (_, w) in self.words.iter_mut() {
                    w.style.disperse = disperse;
                }
            }
            ControlCommand::Texture(t) => {
                let glitch = remap_clamped(t, 0.0, 1.0, 0.0, 0.8);
                for (_, w) in self.words.iter_mut() {
                    w.style.glitch = glitch;
                }
            }
            ControlCommand::Contrast(c) => {
                self.params.rotation_speed = remap_clamped(c, 0.0, 1.0, 0.0, 2.0);
            }
        }
    }

    fn apply_manual(&mut self, cmd: ManualCommand, ctx: &mut FrameContext<'_>) -> bool {
        match cmd {
            ManualCommand::ClearWords => self.clear_words(),
            ManualCommand::RetriggerAll => self.retrigger_all(ctx.rng),
            ManualCommand::SpawnPair => {
                self.spawn_pair(ctx.canvas, ctx.rng);
            }
            ManualCommand::SelectDualitySet(i) => return self.select_set(i),
            ManualCommand::SpawnClick(at) => {
                self.spawn_click(at, ctx.rng);
            }
            ManualCommand::SelectScene(_) => return false,
        }
        true
    }

    fn tick(&mut self, _ctx: &mut FrameContext<'_>) {
        let speed = self.params.rotation_speed;
        if speed != 0.0 {
            for (_, w) in self.words.iter_mut() {
                w.style.rotation_deg = (w.style.rotation_deg + speed) % 360.0;
            }
        }
        self.words.update_all();
        let removed = self.words.remove_dead();
        if removed > 0 {
            tracing::trace!(removed, remaining = self.words.len(), "culled words");
        }
    }

    fn render(
        &mut self,
        ctx: &mut FrameContext<'_>,
        out: &mut Surface,
    ) -> EngineResult<SceneOutput> {
        out.clear(self.params.background.with_alpha(255.0));
        let Some(text) = self.text.as_mut() else {
            return Ok(SceneOutput::Rendered);
        };
        let mut pass = VectorPass::for_surface(out)?;
        for (_, word) in self.words.iter() {
            text.prepare(word.text());
            let layout = layout_word(word, &*text, ctx.time, ctx.rng);
            text.draw_word(&mut pass, &layout);
        }
        pass.composite_onto(out)?;
        Ok(SceneOutput::Rendered)
    }

    fn status_lines(&self) -> Vec<String> {
        vec![
            "SCENE: DUALISMOS (2)".to_string(),
            format!("WORDS: {}", self.words.len()),
            format!("SET: {} (3-5)", self.params.duality_set),
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/dualism.rs"]
mod tests;
