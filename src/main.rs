//! Khiryanov Range entry point
//!
//! Runs the simulation headless: a demo autopilot plays for a fixed number of
//! ticks against the opponent cannon, then the run summary is logged.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use khiryanov_range::Settings;
use khiryanov_range::platform::{DemoInput, FixedClock};
use khiryanov_range::renderer::NullCanvas;
use khiryanov_range::sim::Manager;

#[derive(Debug, Parser)]
#[command(name = "khiryanov-range", about = "Concurrent arcade shooting range simulation")]
struct Cli {
    /// JSON settings file; missing fields fall back to defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to play before quitting
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// RNG seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// Targets per mission (overrides the settings file)
    #[arg(long)]
    targets: Option<usize>,

    /// Run as fast as possible instead of at the configured tick rate
    #[arg(long)]
    unpaced: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Khiryanov Range starting...");

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(seed) = cli.seed {
        settings.seed = Some(seed);
    }
    if let Some(targets) = cli.targets {
        settings.num_targets = targets;
    }

    let mut clock = if cli.unpaced {
        FixedClock::unpaced()
    } else {
        FixedClock::new(settings.tick_duration())
    };
    let demo_seed = settings.seed.unwrap_or(0) ^ 0x5eed;

    let mut manager = Manager::new(settings).context("validating settings")?;
    let mut input = DemoInput::new(manager.registry().clone(), cli.ticks, demo_seed);
    let mut canvas = NullCanvas::default();

    let summary = manager.run(&mut input, &mut canvas, &mut clock);
    println!(
        "ticks={} missions={} destroyed={} used={} score={}",
        summary.ticks,
        summary.missions,
        summary.score.targets_destroyed,
        summary.score.projectiles_used,
        summary.score.score()
    );
    Ok(())
}
