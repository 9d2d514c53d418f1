use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use lyricflow::PlaybackClock as _;

#[derive(Parser, Debug)]
#[command(name = "lyricflow", version)]
struct Cli {
    /// Log scene and state-machine activity to stderr (repeat for more detail).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every line's state, alpha and layout at one playback position, as JSON.
    States(StatesArgs),
    /// Run the frame loop headlessly and print a per-second summary.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct SongArgs {
    /// Timing table JSON (`[{ "text", "start_time", "duration", "alignment" }]`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Lyrics config JSON; missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font file used for measurement instead of the built-in monospace metrics.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Window width in pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Window height in pixels.
    #[arg(long, default_value_t = 720.0)]
    height: f64,
}

#[derive(Parser, Debug)]
struct StatesArgs {
    #[command(flatten)]
    song: SongArgs,

    /// Playback position in seconds.
    #[arg(long)]
    at: f64,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    song: SongArgs,

    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Stop after this many seconds of playback.
    #[arg(long)]
    until: f64,

    /// Seek to this position once playback reaches `--seek-at`.
    #[arg(long, requires = "seek_at")]
    seek_to: Option<f64>,

    /// Playback position that triggers the seek.
    #[arg(long, requires = "seek_to")]
    seek_at: Option<f64>,
}

#[derive(serde::Serialize)]
struct LineReport<'a> {
    index: usize,
    text: &'a str,
    state: lyricflow::LineState,
    alpha: u8,
    distance: usize,
    bounds: lyricflow::Bounds,
}

#[derive(serde::Serialize)]
struct StatesReport<'a> {
    elapsed: f64,
    reference: usize,
    intermission: bool,
    lines: Vec<LineReport<'a>>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::States(args) => cmd_states(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_to_string(path: &Path, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {what} '{}'", path.display()))
}

fn load_song(args: &SongArgs) -> anyhow::Result<(lyricflow::TimingTable, lyricflow::LyricsConfig)> {
    let table = lyricflow::TimingTable::from_json_str(&read_to_string(&args.in_path, "timing table")?)
        .with_context(|| format!("parse timing table '{}'", args.in_path.display()))?;
    let config = match &args.config {
        Some(path) => lyricflow::LyricsConfig::from_json_str(&read_to_string(path, "config")?)
            .with_context(|| format!("parse config '{}'", path.display()))?,
        None => lyricflow::LyricsConfig::default(),
    };
    Ok((table, config))
}

fn make_measurer(font: Option<&Path>) -> anyhow::Result<Box<dyn lyricflow::TextMeasurer>> {
    Ok(match font {
        Some(path) => {
            let bytes =
                std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
            let measurer = lyricflow::ParleyMeasurer::new(&bytes, None)?;
            tracing::debug!(family = measurer.family_name(), "using font");
            Box::new(measurer)
        }
        None => Box::new(lyricflow::MonospaceMeasurer::default()),
    })
}

fn window(args: &SongArgs) -> anyhow::Result<lyricflow::Bounds> {
    if !(args.width > 0.0 && args.height > 0.0) {
        anyhow::bail!("window size must be positive, got {}x{}", args.width, args.height);
    }
    Ok(lyricflow::Bounds::new(0.0, 0.0, args.width, args.height))
}

fn cmd_states(args: StatesArgs) -> anyhow::Result<()> {
    let (table, config) = load_song(&args.song)?;
    let mut measurer = make_measurer(args.song.font.as_deref())?;
    let mut backend = lyricflow::RecordingBackend::new();
    let mut graph = lyricflow::SceneGraph::new(window(&args.song)?);
    let root = graph.root();

    let mut ctx = lyricflow::UiCtx::new(measurer.as_mut(), &mut backend);
    let mut view = lyricflow::LyricsView::create(&mut graph, &mut ctx, root, table, config)?;
    view.advance(&mut graph, &mut ctx, args.at)?;

    let plan = view.plan();
    let mut lines = Vec::with_capacity(plan.lines.len());
    for (index, (line, lp)) in view.table().lines().iter().zip(&plan.lines).enumerate() {
        let drawable = view
            .line_drawable(index)
            .with_context(|| format!("line {index} has no drawable"))?;
        let bounds = graph
            .drawable(drawable)
            .map(|d| d.bounds())
            .with_context(|| format!("line {index} drawable missing from the scene"))?;
        lines.push(LineReport {
            index,
            text: &line.text,
            state: lp.state,
            alpha: lp.alpha,
            distance: lp.distance,
            bounds,
        });
    }
    let report = StatesReport {
        elapsed: args.at,
        reference: plan.reference,
        intermission: plan.intermission,
        lines,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    if args.fps == 0 {
        anyhow::bail!("--fps must be > 0");
    }
    if !(args.until.is_finite() && args.until >= 0.0) {
        anyhow::bail!("--until must be finite and >= 0");
    }
    let (table, config) = load_song(&args.song)?;
    let win = window(&args.song)?;
    let total = table.end_time().max(args.until);
    let mut clock = lyricflow::ManualClock::new(total)?;
    let mut session = lyricflow::LyricsSession::new(
        make_measurer(args.song.font.as_deref())?,
        lyricflow::RecordingBackend::new(),
        win,
        table,
        config,
    )?;

    let dt = 1.0 / f64::from(args.fps);
    let frames = (args.until * f64::from(args.fps)).round() as u64;
    let mut pending_seek = args.seek_at.zip(args.seek_to);
    let mut total_draws = 0usize;
    let mut next_report = 0.0;

    for _ in 0..frames {
        clock.advance(dt);
        if let Some((at, to)) = pending_seek
            && clock.elapsed_time() >= at
        {
            clock.seek(to)?;
            pending_seek = None;
            println!("seek -> {to:.2}");
        }
        let stats = session.frame(&clock, dt, win)?;
        total_draws += stats.draws;
        if stats.elapsed + 1e-9 >= next_report {
            println!(
                "t={:>7.2} active={:<5} draws={}",
                stats.elapsed,
                stats
                    .active_line
                    .map_or_else(|| "-".to_string(), |i| i.to_string()),
                stats.draws
            );
            next_report = stats.elapsed.floor() + 1.0;
        }
    }

    let (_, backend) = session.close()?;
    println!(
        "frames={frames} draws={total_draws} live_content={}",
        backend.live_count()
    );
    Ok(())
}
