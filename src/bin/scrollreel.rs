use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollreel::{PanelConfig, PanelId, SceneSurface, Stage, Viewport};

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a panel at one scroll offset and print its state as JSON.
    Eval(EvalArgs),
    /// Sample the whole scroll window, one JSON line per sample.
    Sweep(SweepArgs),
    /// Run layout reconciliation to completion and print the report.
    Settle(PanelArgs),
}

#[derive(Parser, Debug)]
struct PanelArgs {
    /// Panel configuration JSON (defaults to the built-in naming sequence).
    #[arg(long)]
    config: Option<PathBuf>,

    /// SVG document holding the container's paths and cues.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Viewport width.
    #[arg(long, default_value_t = 1440.0)]
    width: f64,

    /// Viewport height.
    #[arg(long, default_value_t = 900.0)]
    height: f64,

    /// Pretend the host can draw strokes natively.
    #[arg(long, default_value_t = false)]
    native_draw: bool,
}

#[derive(Parser, Debug)]
struct EvalArgs {
    #[command(flatten)]
    panel: PanelArgs,

    /// Scroll offset.
    #[arg(long, allow_hyphen_values = true)]
    scroll: f64,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    #[command(flatten)]
    panel: PanelArgs,

    /// Number of intervals; prints `steps + 1` samples.
    #[arg(long, default_value_t = 10)]
    steps: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Eval(args) => cmd_eval(args),
        Command::Sweep(args) => cmd_sweep(args),
        Command::Settle(args) => cmd_settle(args),
    }
}

const MAX_SETTLE_FRAMES: u64 = 64;

fn mount(args: &PanelArgs) -> anyhow::Result<(Stage<SceneSurface>, PanelId, PanelConfig)> {
    let config = match &args.config {
        Some(path) => PanelConfig::from_path(path)?,
        None => PanelConfig::naming_sequence(),
    };
    let viewport = Viewport::new(args.width, args.height)?;
    let surface = match &args.svg {
        Some(path) => {
            let svg = std::fs::read_to_string(path)
                .with_context(|| format!("read svg '{}'", path.display()))?;
            SceneSurface::from_svg_str(&svg, &config.container, config.start, viewport)?
        }
        None => scrollreel::synthesize_scene(&config, viewport)?,
    }
    .with_native_draw(args.native_draw);

    let mut stage = Stage::new(&surface, viewport);
    let id = stage
        .try_mount(PanelId::new("panel"), config.clone(), surface)
        .context("mount panel")?;
    Ok((stage, id, config))
}

fn snapshot_json(stage: &Stage<SceneSurface>, id: &PanelId) -> anyhow::Result<serde_json::Value> {
    let panel = stage.panel(id).context("panel vanished")?;
    Ok(serde_json::to_value(panel.snapshot())?)
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let (mut stage, id, _) = mount(&args.panel)?;
    stage.scroll_to(args.scroll);
    stage.run_until_idle(MAX_SETTLE_FRAMES);
    let out = snapshot_json(&stage, &id)?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    let (mut stage, id, config) = mount(&args.panel)?;
    let steps = args.steps.max(1);
    for i in 0..=steps {
        let scroll = config.start + config.duration * f64::from(i) / f64::from(steps);
        stage.scroll_to(scroll);
        stage.tick();
        println!("{}", serde_json::to_string(&snapshot_json(&stage, &id)?)?);
    }
    Ok(())
}

fn cmd_settle(args: PanelArgs) -> anyhow::Result<()> {
    let (mut stage, id, _) = mount(&args)?;
    let panel = stage.panel_mut(&id).context("panel vanished")?;
    let report = panel.settle();
    let constraints: Vec<serde_json::Value> = panel
        .reconciler()
        .constraints()
        .iter()
        .map(|c| {
            serde_json::json!({
                "anchor": c.anchor,
                "subject": c.subject,
                "token": c.token,
                "target": c.target_gap,
                "gap": c.gap(panel.surface()),
            })
        })
        .collect();
    let out = serde_json::json!({ "report": report, "constraints": constraints });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
