use std::path::PathBuf;

use cbox_renderer::Backend;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels selectable on the command line
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Execution strategy for each iteration
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BackendArg {
    /// Single stream, row-major
    Sequential,
    /// Buckets on the rayon thread pool
    Parallel,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Sequential => Backend::Sequential,
            BackendArg::Parallel => Backend::Parallel,
        }
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "cbox")]
#[command(about = "Progressive Cornell box path tracer")]
pub struct Args {
    /// Number of iterations to accumulate
    #[arg(default_value = "256")]
    pub iterations: u32,

    /// JSON render configuration; flags below override its fields
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Camera rays per pixel per iteration
    #[arg(long, short = 's')]
    pub spp: Option<u32>,

    /// Maximum bounce depth
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Base random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Remaining depth below which paths always survive roulette
    #[arg(long)]
    pub forced_survival_below: Option<u32>,

    /// Disable Russian roulette
    #[arg(long)]
    pub no_roulette: bool,

    /// Iteration backend
    #[arg(long, value_enum, default_value = "parallel")]
    pub backend: BackendArg,

    /// Output file (.ppm for ASCII P3, other extensions via the image crate)
    #[arg(short, long, default_value = "output_cpu.ppm")]
    pub output: PathBuf,

    /// Logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
