//! # CHAINFX Preview
//!
//! Runs the landing page effects headlessly and prints what they drew.
//!
//! ```bash
//! # Desktop, 3 seconds at 60 FPS, simulated time
//! fx_preview --frames 180
//!
//! # Mobile width, real-time pacing, verbose logs
//! RUST_LOG=chainfx=debug fx_preview --width 390 --height 844 --realtime
//!
//! # Reduced motion on a retina display
//! fx_preview --reduced-motion --dpr 2
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chainfx::{
    FrameClock, FrameLoop, IntervalClock, LandingConfig, LoopControl, ManualClock, Stage,
};
use chainfx::ui::{HeadlessCanvas, Size, StaticPreferences};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fx_preview")]
#[command(about = "Headless preview of the landing page particle field and stat counters", long_about = None)]
#[command(version)]
struct Cli {
    /// Landing config (TOML). Built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Viewport width in logical pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Viewport height in logical pixels
    #[arg(long, default_value_t = 720.0)]
    height: f32,

    /// Frames to run
    #[arg(short, long, default_value_t = 180)]
    frames: u64,

    /// Frame rate
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Pace frames on the wall clock instead of simulating time
    #[arg(long)]
    realtime: bool,

    /// Prefer reduced motion
    #[arg(long)]
    reduced_motion: bool,

    /// Device pixel ratio
    #[arg(long, default_value_t = 1.0)]
    dpr: f32,

    /// Fixed RNG seed for a reproducible field
    #[arg(long)]
    seed: Option<u64>,

    /// Frame at which the stat row scrolls into view
    #[arg(long, default_value_t = 30)]
    scroll_at: u64,
}

fn main() -> Result<()> {
    let default_level = "info";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => LandingConfig::load(path)
            .with_context(|| format!("loading landing config {}", path.display()))?,
        None => LandingConfig::default(),
    };
    if cli.seed.is_some() {
        config.field.seed = cli.seed;
    }

    let prefs = StaticPreferences {
        reduced_motion: cli.reduced_motion,
        device_pixel_ratio: cli.dpr,
    };
    let mut stage = Stage::new(
        HeadlessCanvas::new(),
        &config,
        Size::new(cli.width, cli.height),
        prefs,
    )
    .context("building stage")?;

    let mut clock: Box<dyn FrameClock> = if cli.realtime {
        Box::new(IntervalClock::new(cli.fps))
    } else {
        Box::new(ManualClock::new(0.0, 1000.0 / f64::from(cli.fps.max(1))))
    };

    let mut frame_loop = FrameLoop::new().with_max_frames(cli.frames);
    let mut frame_index = 0u64;
    let mut lines = 0u64;
    let summary = frame_loop.run(clock.as_mut(), |now| {
        if frame_index == 0 {
            stage.mount(now);
        }
        if frame_index == cli.scroll_at {
            stage.scroll_to_stats(now);
        }
        let report = stage.frame(now);
        lines += u64::from(report.field.connections_drawn);
        frame_index += 1;

        if stage.is_idle() {
            LoopControl::Stop
        } else {
            LoopControl::Continue
        }
    });

    let field = stage.field();
    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    CHAINFX PREVIEW");
    println!("═══════════════════════════════════════════════════════════════════");
    println!("viewport        {} x {}", cli.width, cli.height);
    if let Some(backing) = field.backing() {
        println!(
            "backing store   {} x {} (scale {})",
            backing.pixel_width, backing.pixel_height, backing.scale
        );
    }
    println!("density tier    {:?}", field.density_tier());
    let heroes = field.particles().iter().filter(|p| p.is_hero()).count();
    println!("particles       {} ({heroes} hero)", field.particles().len());
    println!("frames          {} ({} over budget)", summary.frames, summary.slow_frames);
    println!("rendered        {}", field.stats().frames_rendered);
    println!("lines drawn     {lines}");
    println!();
    for stat in stage.stats() {
        let state = if stat.settled { "" } else { " (counting)" };
        println!("{:>12}  {}{}", stat.display, stat.label, state);
    }

    stage.unmount();
    Ok(())
}
