//! Active-scene selection and control dispatch.
//!
//! Both scenes live for the whole session; switching only changes which one receives control
//! commands, ticks and render calls. Manual pointer clicks are the one exception: they always
//! reach the word scene, whichever scene is showing.

use crate::control::message::{ControlCommand, ControlMessage, InputEvent, ManualCommand};
use crate::engine::FrameContext;
use crate::foundation::error::EngineResult;
use crate::render::surface::Surface;
use crate::scene::dualism::DualismScene;
use crate::scene::landscape::LandscapeScene;

/// Which scene is showing.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    /// Deformed landscape images with feedback trails.
    #[default]
    Landscape,
    /// Ephemeral word pairs.
    Dualism,
}

impl SceneKind {
    /// Stable lowercase name (used as the fault-log subsystem).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Dualism => "dualism",
        }
    }
}

impl std::fmt::Display for SceneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a scene produced for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneOutput {
    /// Normal content.
    Rendered,
    /// The scene had nothing to show and drew this message instead.
    Placeholder(String),
}

/// One scene variant: its own reactive state, update and render.
pub trait Scene {
    /// Tag of this variant.
    fn kind(&self) -> SceneKind;

    /// Apply one decoded control command.
    fn apply_control(&mut self, cmd: ControlCommand, ctx: &mut FrameContext<'_>);

    /// Apply a manual command. Returns `false` when this scene ignores it.
    fn apply_manual(&mut self, cmd: ManualCommand, ctx: &mut FrameContext<'_>) -> bool {
        let _ = (cmd, ctx);
        false
    }

    /// Per-frame state advance.
    fn tick(&mut self, ctx: &mut FrameContext<'_>);

    /// Draw the scene into `out`, which is sized to the output canvas.
    fn render(&mut self, ctx: &mut FrameContext<'_>, out: &mut Surface)
    -> EngineResult<SceneOutput>;

    /// Short status lines for the diagnostic overlay.
    fn status_lines(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Owner of both scenes and the active tag.
#[derive(Debug)]
pub struct SceneRouter {
    active: SceneKind,
    landscape: LandscapeScene,
    dualism: DualismScene,
}

impl SceneRouter {
    /// Router starting on the landscape scene.
    pub fn new(landscape: LandscapeScene, dualism: DualismScene) -> Self {
        Self {
            active: SceneKind::Landscape,
            landscape,
            dualism,
        }
    }

    /// Currently active scene.
    pub fn active(&self) -> SceneKind {
        self.active
    }

    /// Landscape state.
    pub fn landscape(&self) -> &LandscapeScene {
        &self.landscape
    }

    /// Landscape state, mutably.
    pub fn landscape_mut(&mut self) -> &mut LandscapeScene {
        &mut self.landscape
    }

    /// Word scene state.
    pub fn dualism(&self) -> &DualismScene {
        &self.dualism
    }

    /// Word scene state, mutably.
    pub fn dualism_mut(&mut self) -> &mut DualismScene {
        &mut self.dualism
    }

    /// The active scene as a trait object.
    pub fn active_scene(&self) -> &dyn Scene {
        match self.active {
            SceneKind::Landscape => &self.landscape,
            SceneKind::Dualism => &self.dualism,
        }
    }

    fn active_scene_mut(&mut self) -> &mut dyn Scene {
        match self.active {
            SceneKind::Landscape => &mut self.landscape,
            SceneKind::Dualism => &mut self.dualism,
        }
    }

    /// Change the active tag. Returns `false` when `kind` was already active.
    pub fn switch(&mut self, kind: SceneKind) -> bool {
        if self.active == kind {
            return false;
        }
        self.active = kind;
        tracing::info!(scene = %kind, "scene switched");
        true
    }

    /// Route one message to the active scene. Unknown addresses return `false` and change nothing.
    pub fn dispatch(&mut self, msg: &ControlMessage, ctx: &mut FrameContext<'_>) -> bool {
        let Some(cmd) = ControlCommand::parse(msg) else {
            tracing::debug!(address = %msg.address, "ignoring unrecognized control message");
            return false;
        };
        tracing::debug!(address = cmd.address(), scene = %self.active, "control");
        self.active_scene_mut().apply_control(cmd, ctx);
        true
    }

    /// Route a key press or click. Returns `false` when nothing handled it.
    pub fn handle_input(&mut self, event: InputEvent, ctx: &mut FrameContext<'_>) -> bool {
        let Some(cmd) = event.command() else {
            return false;
        };
        match cmd {
            ManualCommand::SelectScene(kind) => {
                self.switch(kind);
                true
            }
            ManualCommand::SpawnClick(_) => self.dualism.apply_manual(cmd, ctx),
            _ => self.active_scene_mut().apply_manual(cmd, ctx),
        }
    }

    /// Advance the active scene by one frame.
    pub fn tick(&mut self, ctx: &mut FrameContext<'_>) {
        self.active_scene_mut().tick(ctx);
    }

    /// Draw the active scene.
    pub fn render(
        &mut self,
        ctx: &mut FrameContext<'_>,
        out: &mut Surface,
    ) -> EngineResult<SceneOutput> {
        self.active_scene_mut().render(ctx, out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/router.rs"]
mod tests;
