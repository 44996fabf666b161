use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use holdframe::{
    DuplicateRule, FrameAction, FrameRange, FrameScheduler, OutputFormat, PreviewRenderer,
    RunConfig, RunState, Scene, StepOutcome, StitchOpts,
};

#[derive(Parser, Debug)]
#[command(name = "holdframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print which frames would be rendered and which copied.
    Plan(PlanArgs),
    /// Render a scene to a numbered image sequence, copying held frames.
    Render(RenderArgs),
    /// Stitch an image sequence into a video (requires `ffmpeg` on PATH).
    Stitch(StitchArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Run config JSON; flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// First frame (defaults to the scene's start).
    #[arg(long, allow_hyphen_values = true)]
    start: Option<i64>,

    /// Last frame, inclusive (defaults to the scene's end).
    #[arg(long, allow_hyphen_values = true)]
    end: Option<i64>,

    /// Largest channel difference still treated as unchanged.
    #[arg(long, allow_hyphen_values = true)]
    tolerance: Option<f64>,

    /// Duplicate decision rule.
    #[arg(long, value_enum)]
    rule: Option<RuleChoice>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Print the plan as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Output directory; frames land in `<out>/images`.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Image format (png, jpg, bmp, tiff, tga, exr).
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Scene units to pixels.
    #[arg(long, default_value_t = 32.0)]
    pixels_per_unit: f64,

    /// Also stitch the finished sequence into this video file.
    #[arg(long)]
    video: Option<PathBuf>,

    /// Audio track for `--video`.
    #[arg(long, requires = "video")]
    audio: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct StitchArgs {
    /// Directory holding `<frame>.<ext>` images.
    #[arg(long)]
    images: PathBuf,

    /// Image format of the sequence.
    #[arg(long, default_value = "png")]
    format: OutputFormat,

    /// First frame.
    #[arg(long)]
    start: i64,

    /// Last frame, inclusive.
    #[arg(long)]
    end: i64,

    /// Frame rate numerator.
    #[arg(long, default_value_t = 24)]
    fps: u32,

    /// Frame rate denominator.
    #[arg(long, default_value_t = 1)]
    fps_den: u32,

    /// Optional audio track.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Output video path.
    #[arg(long)]
    out: PathBuf,

    /// Fail instead of replacing an existing output.
    #[arg(long)]
    no_overwrite: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RuleChoice {
    Unchanged,
    MatchPrevious,
}

impl From<RuleChoice> for DuplicateRule {
    fn from(c: RuleChoice) -> Self {
        match c {
            RuleChoice::Unchanged => Self::Unchanged,
            RuleChoice::MatchPrevious => Self::MatchPrevious,
        }
    }
}

/// Run config file: every field optional, filled from the scene when absent.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    start: Option<i64>,
    end: Option<i64>,
    tolerance: Option<f64>,
    output_directory: Option<PathBuf>,
    format: Option<OutputFormat>,
    rule: Option<DuplicateRule>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Render(args) => cmd_render(args),
        Command::Stitch(args) => cmd_stitch(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_config(path: Option<&Path>) -> anyhow::Result<ConfigFile> {
    let Some(path) = path else {
        return Ok(ConfigFile::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse config '{}'", path.display()))
}

/// Flags, then the config file, then the scene.
fn resolve(
    run: &RunArgs,
    scene: &Scene,
    out: Option<PathBuf>,
    format: Option<OutputFormat>,
) -> anyhow::Result<RunConfig> {
    let file = read_config(run.config.as_deref())?;
    let start = run.start.or(file.start).unwrap_or(scene.frame_start);
    let end = run.end.or(file.end).unwrap_or(scene.frame_end);

    let mut cfg = RunConfig::new(FrameRange::from_bounds(start, end), PathBuf::new());
    cfg.output_directory = out
        .or(file.output_directory)
        .map(|dir| dir.join(&scene.name));
    if let Some(tol) = run.tolerance.or(file.tolerance) {
        cfg.tolerance = tol;
    }
    if let Some(format) = format.or(file.format) {
        cfg.format = format;
    }
    if let Some(rule) = run.rule.map(DuplicateRule::from).or(file.rule) {
        cfg.rule = rule;
    }
    Ok(cfg)
}

fn load_scene(path: &Path) -> anyhow::Result<Scene> {
    Scene::load(path).with_context(|| format!("load scene '{}'", path.display()))
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.run.scene)?;
    let cfg = resolve(&args.run, &scene, None, None)?;
    cfg.validate_for_planning()?;
    let plan = holdframe::plan(&scene, cfg.range, cfg.tolerance, cfg.rule)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }
    for (frame, skip) in plan.iter() {
        println!("{frame}\t{}", if skip { "copy" } else { "render" });
    }
    println!(
        "frames={} render={} copy={}",
        plan.frame_count(),
        plan.total_render,
        plan.total_skip
    );
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut scene = load_scene(&args.run.scene)?;
    let cfg = resolve(&args.run, &scene, args.out, args.format)?;
    let format = cfg.format;
    let range = cfg.range;

    let renderer = PreviewRenderer {
        pixels_per_unit: args.pixels_per_unit,
    };
    let mut scheduler = FrameScheduler::on_disk(renderer);
    let mut state = scheduler.begin(&scene, cfg)?;
    let total = state.plan().frame_count();

    let end = scheduler.run(&mut state, &mut scene, |st, outcome| {
        if let StepOutcome::Frame(report) = outcome {
            let how = match report.action {
                FrameAction::Rendered => "render",
                FrameAction::Copied { .. } => "copy",
                FrameAction::CopyFallback => "render (copy failed)",
            };
            eprintln!(
                "frame {} [{}/{}] {how:<20} {:>5.1}%  eta {}",
                report.frame,
                st.stats().frames_total,
                total,
                st.progress() * 100.0,
                fmt_hms(st.eta())
            );
        }
    })?;

    let stats = state.stats();
    eprintln!(
        "{end:?}: {} rendered, {} copied, {} copy fallbacks -> {}",
        stats.frames_rendered,
        stats.frames_copied,
        stats.copy_fallbacks,
        state.images_dir().display()
    );
    if end != RunState::Completed {
        anyhow::bail!("run ended as {end:?}");
    }

    if let Some(video) = args.video {
        let mut opts = StitchOpts::new(state.images_dir(), format, range, scene.fps, video);
        opts.audio = args.audio;
        holdframe::stitch(&opts)?;
        eprintln!("wrote {}", opts.out_path.display());
    }
    Ok(())
}

fn cmd_stitch(args: StitchArgs) -> anyhow::Result<()> {
    let fps = holdframe::Fps::new(args.fps, args.fps_den)?;
    let mut opts = StitchOpts::new(
        args.images,
        args.format,
        FrameRange::from_bounds(args.start, args.end),
        fps,
        args.out,
    );
    opts.audio = args.audio;
    opts.overwrite = !args.no_overwrite;
    holdframe::stitch(&opts)?;
    eprintln!("wrote {}", opts.out_path.display());
    Ok(())
}

fn fmt_hms(d: Duration) -> String {
    let s = d.as_secs();
    format!("{:02}:{:02}:{:02}", s / 3600, (s / 60) % 60, s % 60)
}
