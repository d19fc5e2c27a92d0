use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use latplot::{init_logger, report, MetricsTable};

/// Bar chart of p99 latency per strategy at one thread count.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Metrics file written by the experiment runner.
    #[arg(long, default_value = "metrics.csv")]
    input: PathBuf,

    /// Directory the image is written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Thread count to compare at.
    #[arg(long, default_value_t = 200)]
    threads: u32,
}

fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();
    let table = MetricsTable::load(&cli.input)
        .with_context(|| format!("loading {}", cli.input.display()))?;
    report::plot_p99_compare(&table, cli.threads, &cli.out_dir)?;
    Ok(())
}
