//! The chart tools' pipelines, from a loaded table to files on disk.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    chart::{render_bar_chart, render_line_chart, BarChart, LineChart},
    Error, Metric, MetricsTable, Result,
};

/// Line charts for `metrics`, or for every metric when the list is empty.
pub fn line_charts(table: &MetricsTable, metrics: &[Metric]) -> Vec<LineChart> {
    let metrics: &[Metric] = if metrics.is_empty() {
        &Metric::ALL
    } else {
        metrics
    };
    metrics
        .iter()
        .map(|metric| LineChart::new(*metric, table.series(*metric)))
        .collect()
}

/// Pretty JSON of `[metric, series]` pairs.
pub fn write_series_json(charts: &[LineChart], path: &Path) -> Result<()> {
    let dump: Vec<_> = charts
        .iter()
        .map(|chart| (chart.metric, &chart.series))
        .collect();
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &dump).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|e| Error::io(path, e))?;
    info!("wrote series to {}", path.display());
    Ok(())
}

pub fn plot_metrics(
    table: &MetricsTable,
    metrics: &[Metric],
    out_dir: &Path,
    dump_json: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(|e| Error::io(out_dir, e))?;
    let charts = line_charts(table, metrics);
    let images = charts
        .iter()
        .map(|chart| render_line_chart(chart, out_dir))
        .collect::<Result<Vec<_>>>()?;
    if let Some(path) = dump_json {
        write_series_json(&charts, path)?;
    }
    Ok(images)
}

pub fn plot_p99_compare(table: &MetricsTable, threads: u32, out_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).map_err(|e| Error::io(out_dir, e))?;
    info!(
        "{} of {} rows at {} threads",
        table.at_threads(threads).len(),
        table.rows().len(),
        threads
    );
    let chart = BarChart::new(threads, table.bars_at(threads, Metric::P99Ms));
    render_bar_chart(&chart, out_dir)
}
