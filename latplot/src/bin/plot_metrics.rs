use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use latplot::{init_logger, report, Metric, MetricsTable};
use tracing::info;

/// Line charts of latency against thread count, one image per metric.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Metrics file written by the experiment runner.
    #[arg(long, default_value = "metrics.csv")]
    input: PathBuf,

    /// Directory the images are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Metrics to plot, all of them when omitted.
    #[arg(long = "metric", value_enum)]
    metrics: Vec<Metric>,

    /// Also write the plotted series as JSON.
    #[arg(long)]
    dump_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();
    let table = MetricsTable::load(&cli.input)
        .with_context(|| format!("loading {}", cli.input.display()))?;
    info!(
        "{} rows, strategies: {:?}",
        table.rows().len(),
        table.strategies()
    );
    let images = report::plot_metrics(
        &table,
        &cli.metrics,
        &cli.out_dir,
        cli.dump_json.as_deref(),
    )?;
    info!("{} charts written", images.len());
    Ok(())
}
