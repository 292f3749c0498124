use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::Level;

use bandmaze::{GenConfig, SeedSource, generate_maze, labfile};

/// Band-partitioned maze generator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of isolated walls placed before generation
    #[arg(default_value_t = GenConfig::DEFAULT_ISLANDS)]
    islands: usize,

    /// Grid height in cells
    #[arg(default_value_t = GenConfig::DEFAULT_ROWS)]
    height: usize,

    /// Grid width in cells
    #[arg(default_value_t = GenConfig::DEFAULT_COLS)]
    width: usize,

    /// Number of workers; must divide the height
    #[arg(long, env = "BANDMAZE_WORKERS", default_value_t = 1)]
    workers: usize,

    /// Base random seed; defaults to the wall clock
    #[arg(long)]
    seed: Option<u64>,

    /// Output file
    #[arg(long, short, default_value = labfile::DEFAULT_PATH)]
    output: PathBuf,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log debug output
    #[arg(long, short)]
    verbose: bool,
}

/// Installs the fmt subscriber. The returned guard flushes buffered logs on drop.
fn init_tracing(args: &Args) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    let (writer, guard) = match &args.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("invalid log file path {}", path.display()))?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name))
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_ansi(args.log_file.is_none())
        .init();
    Ok(guard)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _guard = init_tracing(&args)?;

    let config = GenConfig {
        islands: args.islands,
        rows: args.height,
        cols: args.width,
        workers: args.workers,
        seed: args.seed.map_or(SeedSource::Clock, SeedSource::Fixed),
    };
    let generated = generate_maze(&config).context("maze generation failed")?;
    labfile::save(&args.output, &generated.grid)?;

    println!(
        "Generation time: {:.6} s ({} workers, {} rounds)",
        generated.elapsed.as_secs_f64(),
        config.workers,
        generated.rounds()
    );
    Ok(())
}
