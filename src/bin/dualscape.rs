use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dualscape", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the live engine, listening for OSC control messages.
    Run(RunArgs),
    /// Replay a JSON input script offline and write the last frame as a PNG.
    Frame(FrameArgs),
}

/// Settings shared by every subcommand; flags override the config file.
#[derive(Args, Debug)]
struct EngineArgs {
    /// Engine config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Directory of landscape images.
    #[arg(long)]
    landscapes: Option<PathBuf>,

    /// Seed for random choices and noise.
    #[arg(long)]
    seed: Option<u64>,

    /// Draw scene status text.
    #[arg(long)]
    status_overlay: bool,

    /// Font file for all text (defaults to a system sans-serif face).
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    #[command(flatten)]
    engine: EngineArgs,

    /// Target frame rate.
    #[arg(long)]
    fps: Option<u32>,

    /// UDP address to receive OSC on.
    #[arg(long)]
    bind: Option<String>,

    /// Stop after this many frames.
    #[arg(long)]
    frames: Option<u64>,

    /// Write PNG snapshots into this directory.
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Snapshot every Nth frame.
    #[arg(long)]
    snapshot_every: Option<u64>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    engine: EngineArgs,

    /// Input script JSON (`{"frames": N, "events": [...]}`).
    #[arg(long)]
    script: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    initialise_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &EngineArgs) -> anyhow::Result<dualscape::EngineConfig> {
    let mut cfg = match &args.config {
        Some(path) => dualscape::EngineConfig::load(path)?,
        None => dualscape::EngineConfig::default(),
    };
    if let Some(w) = args.width {
        cfg.width = w;
    }
    if let Some(h) = args.height {
        cfg.height = h;
    }
    if let Some(dir) = &args.landscapes {
        cfg.landscapes_dir = dir.clone();
    }
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if args.status_overlay {
        cfg.status_overlay = true;
    }
    if let Some(font) = &args.font {
        cfg.font_path = Some(font.clone());
    }
    Ok(cfg)
}

fn build_engine(cfg: dualscape::EngineConfig) -> anyhow::Result<dualscape::EngineState> {
    cfg.validate()?;
    let images = dualscape::ImageLibrary::load_dir(&cfg.landscapes_dir)?;
    Ok(dualscape::EngineState::new(cfg, images)?)
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.engine)?;
    if let Some(fps) = args.fps {
        cfg.fps = fps;
    }
    if let Some(bind) = &args.bind {
        cfg.osc_bind = bind.clone();
    }
    if let Some(every) = args.snapshot_every {
        cfg.snapshot_every = every;
    }

    let bind = cfg.osc_bind.clone();
    let capacity = cfg.queue_capacity;
    let snapshot_every = cfg.snapshot_every;
    let mut engine = build_engine(cfg)?;

    let (sender, queue) = dualscape::control_channel(capacity);
    let receiver = dualscape::OscReceiver::spawn(&bind, sender)
        .with_context(|| format!("start OSC receiver on '{bind}'"))?;

    let mut presenter: Box<dyn dualscape::FramePresenter> = match &args.snapshot_dir {
        Some(dir) => Box::new(dualscape::PngSnapshotPresenter::new(
            dir.clone(),
            snapshot_every,
        )?),
        None => Box::new(dualscape::NullPresenter::default()),
    };

    let frame_loop = dualscape::FrameLoop::new(engine.fps()).with_max_frames(args.frames);
    let summary = frame_loop.run(&mut engine, &queue, presenter.as_mut());
    drop(receiver);

    eprintln!(
        "{} frames ({} degraded, {} late), {} control messages applied",
        summary.frames, summary.degraded_frames, summary.late_frames, summary.messages_applied
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.engine)?;
    let script = dualscape::FrameScript::load(&args.script)?;
    let mut engine = build_engine(cfg)?;

    let mut presenter = dualscape::NullPresenter::default();
    let last = script.play(&mut engine, &mut presenter)?;
    if let Some(report) = &last {
        eprintln!("frame {}: {:?}", report.index.0, report.status);
    }

    dualscape::write_png(engine.output(), &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
