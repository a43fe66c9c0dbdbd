#![forbid(unsafe_code)]

//! `dualscape` is a control-reactive visual engine with two scenes.
//!
//! - **Landscape**: images warped through a noise-driven mesh, composited with blur, erosion,
//!   tint and vignette, and trailed by a decaying feedback buffer. Kicks step through the images
//!   with a crossfade.
//! - **Dualism**: opposing word pairs that spawn on kicks, react to bass, melody and texture
//!   levels, and fade out over their lifetime.
//!
//! Control arrives as addressed numeric messages (OSC over UDP in the binary). The frame loop
//! drains them at the top of every frame and applies them to the active scene through
//! [`SceneRouter`].
//!
//! Quick start:
//!
//! ```no_run
//! use dualscape::{ControlMessage, EngineConfig, EngineState, ImageLibrary};
//!
//! let config = EngineConfig::default();
//! let images = ImageLibrary::load_dir(&config.landscapes_dir)?;
//! let mut engine = EngineState::new(config, images)?;
//! let report = engine.frame([ControlMessage::new("/kick", vec![])]);
//! println!("{:?}", report.status);
//! # Ok::<(), dualscape::EngineError>(())
//! ```

pub mod assets;
pub mod composite;
pub mod config;
pub mod control;
pub mod deform;
pub mod engine;
pub mod entity;
pub mod foundation;
pub mod mapping;
pub mod render;
pub mod runtime;
pub mod scene;

pub use assets::images::{IMAGE_EXTENSIONS, ImageHandle, ImageLibrary, decode_image};
pub use composite::effects::{erosion_overlay, tint, vignette};
pub use composite::feedback::{CompositeInputs, FeedbackCompositor};
pub use composite::transition::{FadeCurve, Transition};
pub use config::{EngineConfig, MeshConfig, WordConfig};
pub use control::message::{ControlCommand, ControlMessage, InputEvent, ManualCommand};
pub use control::osc::{
    ControlQueue, ControlSender, DEFAULT_BIND, DEFAULT_QUEUE_CAPACITY, OscReceiver,
    control_channel, decode_datagram,
};
pub use deform::mesh::{DeformParams, DeformationMesh, MeshVertex};
pub use deform::noise::{ConstantField, NoiseField, PerlinField};
pub use engine::{EngineState, FrameContext, FrameReport, FrameStatus};
pub use entity::store::{EntityId, EntityStore};
pub use entity::typography::{GlyphMetrics, GlyphPlacement, WordLayout, layout_word};
pub use entity::word::{FADE_THRESHOLD, Typography, Word};
pub use foundation::core::{
    Affine, Canvas, Fps, FrameIndex, Point, Rect, Rgb8, Rgba8Premul, Vec2, Vec3,
};
pub use foundation::error::{EngineError, EngineResult, FaultLog};
pub use foundation::rng::Rng64;
pub use mapping::remap::{
    decay, hsb_to_rgb, note_to_hue, relax_toward, remap, remap_clamped,
};
pub use render::blur::{blur_amount, blur_in_place};
pub use render::mesh_paint::{ContentPainter, FlatPainter, MeshPainter, Perspective};
pub use render::surface::Surface;
pub use render::text::{FontFace, TextEngine, WORD_LETTER_SPACING};
pub use render::vector::VectorPass;
pub use runtime::{
    FrameLoop, FramePresenter, FrameScript, NullPresenter, PngSnapshotPresenter, RunSummary,
    ScriptAction, ScriptEvent, write_png,
};
pub use scene::dualism::{DUALITY_SETS, DualismParams, DualismScene, DualitySet};
pub use scene::landscape::{LandscapeParams, LandscapeScene};
pub use scene::router::{Scene, SceneKind, SceneOutput, SceneRouter};
