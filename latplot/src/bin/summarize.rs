use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use latplot::{
    init_logger,
    summary::{append_row, read_samples},
    LatencySummary,
};
use tracing::info;

/// Summarize raw latency samples into a row of the metrics file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// One latency sample in nanoseconds per line.
    #[arg(long)]
    samples: PathBuf,

    /// Name of the strategy that produced the samples.
    #[arg(long)]
    strategy: String,

    /// Number of concurrent client threads in the run.
    #[arg(long)]
    threads: u32,

    /// Metrics file the summary row is appended to.
    #[arg(long, default_value = "metrics.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();
    let samples = read_samples(&cli.samples)
        .with_context(|| format!("reading {}", cli.samples.display()))?;
    let summary = LatencySummary::from_samples(&samples);
    info!("requests: {}", summary.count);
    if summary.count > 0 {
        info!("avg write time (ns): {}", summary.avg_ns);
        info!("max write time (ns): {}", summary.max_ns);
        info!("p95 write time (ns): {}", summary.p95_ns);
        info!("p99 write time (ns): {}", summary.p99_ns);
    }
    append_row(&cli.output, &cli.strategy, cli.threads, &summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::Cli;

    #[test]
    fn every_flag_has_help() {
        let cmd = Cli::command();
        cmd.clone().debug_assert();
        for arg in cmd.get_arguments() {
            let id = arg.get_id().as_str();
            if id == "help" || id == "version" {
                continue;
            }
            assert!(arg.get_help().is_some(), "--{id} has no help text");
        }
    }
}
