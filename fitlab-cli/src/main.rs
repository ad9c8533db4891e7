//! fitlab CLI: build the fitness-landscape figures.
//!
//! Commands:
//! - `smooth-fit`: proportion fit and mean fitness vs Hamming distance
//! - `fig6`: mean generations to f=1 vs mutation probability, with fits
//! - `fig-s1`: histograms of generations between fitness increments
//! - `all`: every figure above
//! - `default-config`: print the default TOML configuration
//! - `cache status` / `cache clear`: inspect or empty the table cache

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use fitlab_core::{CacheMode, FigureConfig};
use fitlab_render::render_figure;
use fitlab_runner::{FigureKind, Pipeline, TableCache};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fitlab", about = "fitlab: fitness landscape figures from simulation output")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Path to a TOML config file. Defaults reproduce the published figures.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Cache mode: recompute, load or auto.
    #[arg(long, global = true)]
    cache: Option<CacheMode>,

    /// Plot ln(mean) in the smooth-fit figures.
    #[arg(long, global = true, default_value_t = false)]
    log_scale: bool,

    /// Master seed for bootstrap resampling. Unset draws from OS entropy.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Directory holding the simulation CSV files.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory for cached summary tables.
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Directory for rendered SVG figures.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Proportion fit and mean fitness against proportional Hamming distance.
    SmoothFit,
    /// Mean generations to f=1 against mutation probability.
    Fig6,
    /// Histograms of generations between fitness increments.
    FigS1,
    /// Build every figure.
    All,
    /// Print the default configuration as TOML.
    DefaultConfig,
    /// Table cache management.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Report cached tables with their shape and write time.
    Status,
    /// Remove every cached table.
    Clear,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match cli.command {
        Commands::DefaultConfig => {
            print!("{}", FigureConfig::default().to_toml()?);
            Ok(())
        }
        Commands::SmoothFit => run_figures(&cli.global, &[FigureKind::SmoothFit]),
        Commands::Fig6 => run_figures(&cli.global, &[FigureKind::Fig6]),
        Commands::FigS1 => run_figures(&cli.global, &[FigureKind::FigS1]),
        Commands::All => run_figures(&cli.global, &FigureKind::ALL),
        Commands::Cache { action } => {
            let config = load_config(&cli.global)?;
            let cache = TableCache::new(&config.cache_dir)?;
            match action {
                CacheAction::Status => run_cache_status(&cache),
                CacheAction::Clear => {
                    let n = cache.len()?;
                    cache.clear()?;
                    println!("Removed {n} cached table(s) from {}", cache.dir().display());
                    Ok(())
                }
            }
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

/// Config file (or defaults) with command-line overrides applied.
fn load_config(args: &GlobalArgs) -> Result<FigureConfig> {
    let mut config = match &args.config {
        Some(path) => FigureConfig::from_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => FigureConfig::default(),
    };
    if let Some(mode) = args.cache {
        config.cache_mode = mode;
    }
    if args.log_scale {
        config.log_scale = true;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &args.cache_dir {
        config.cache_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

fn run_figures(args: &GlobalArgs, kinds: &[FigureKind]) -> Result<()> {
    let config = load_config(args)?;
    info!(
        data_dir = %config.data_dir.display(),
        cache_mode = ?config.cache_mode,
        seed = ?config.seed,
        "starting"
    );
    let pipeline = Pipeline::new(config)?;
    for path in write_figures(&pipeline, kinds)? {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Build every requested figure, then render. Nothing is written unless all
/// builds succeed.
fn write_figures(pipeline: &Pipeline, kinds: &[FigureKind]) -> Result<Vec<PathBuf>> {
    let mut figures = Vec::new();
    for &kind in kinds {
        let built = pipeline
            .build(kind)
            .with_context(|| format!("build {kind}"))?;
        figures.extend(built);
    }

    let config = pipeline.config();
    figures
        .iter()
        .map(|figure| render_figure(figure, &config.style, &config.output_dir))
        .collect()
}

fn run_cache_status(cache: &TableCache) -> Result<()> {
    let keys = cache.keys()?;
    println!("Cache: {} ({} table(s))", cache.dir().display(), keys.len());
    for key in keys {
        match cache.get_meta(&key)? {
            Some(meta) => println!(
                "  {key:<16} {:>4} x {:<3} {}",
                meta.rows,
                meta.columns,
                meta.cached_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => println!("  {key:<16} (no sidecar)"),
        }
    }
    Ok(())
}
