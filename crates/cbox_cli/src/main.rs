//! Cornell box renderer driver.
//!
//! Runs the requested number of iterations, logs the residual between
//! successive normalized images, then writes the final image.

mod cli;

use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use cbox_renderer::{save_image, ConvergenceMonitor, RenderConfig, RenderSession};
use clap::Parser;
use log::LevelFilter;

use crate::cli::Args;

fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Build the render configuration from an optional JSON file and flags.
fn load_config(args: &Args) -> Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => RenderConfig::default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(spp) = args.spp {
        config.samples_per_iteration = spp;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(below) = args.forced_survival_below {
        config.roulette.forced_survival_below = below;
    }
    if args.no_roulette {
        config.roulette.enabled = false;
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.clone().into());

    let config = load_config(&args)?;
    let backend = args.backend.into();
    let mut session = RenderSession::cornell(config).context("Failed to set up render session")?;

    let (width, height) = (session.config().width, session.config().height);
    let mut monitor = ConvergenceMonitor::new(session.config().pixel_count());

    let start = Instant::now();
    for it in 1..=args.iterations {
        session.iterate(backend)?;
        let residual = monitor.observe(session.normalized()?)?;
        log::info!("Iteration {} residual = {:.6e}", it, residual);
    }
    log::info!("Rendered {} iterations in {:?}", session.iterations(), start.elapsed());

    let image = session.normalized().context("No iterations were rendered")?;
    save_image(&args.output, width, height, &image)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
