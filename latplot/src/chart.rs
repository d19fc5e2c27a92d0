//! Chart models and their `plotters` rendering.
//!
//! Models are plain data so the layout decisions (titles, file names, axis
//! ranges) can be checked without a font stack; the `render_*` functions turn
//! them into PNG files.

use std::{
    error::Error as StdError,
    ops::Range,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use plotters::prelude::*;
use tracing::{debug, info, warn};

use crate::{Bar, Error, Metric, Result, Series};

const CHART_SIZE: (u32, u32) = (800, 600);
const FONT: &str = "sans-serif";
const Y_HEADROOM: f64 = 1.1;

type DrawResult = std::result::Result<(), Box<dyn StdError>>;

fn y_range(max: Option<f64>) -> Range<f64> {
    match max {
        Some(max) if max.is_finite() && max > 0.0 => 0.0..max * Y_HEADROOM,
        _ => 0.0..1.0,
    }
}

/// Latency of every strategy against thread count, for one metric.
#[derive(Debug, Clone)]
pub struct LineChart {
    pub metric: Metric,
    pub series: Vec<Series>,
}

impl LineChart {
    pub fn new(metric: Metric, series: Vec<Series>) -> Self {
        LineChart { metric, series }
    }

    pub fn title(&self) -> String {
        format!("{} comparison", self.metric)
    }

    pub fn file_name(&self) -> String {
        format!("{}.png", self.metric)
    }

    fn points(&self) -> impl Iterator<Item = &(u32, f64)> {
        self.series.iter().flat_map(|s| s.points.iter())
    }

    pub fn x_range(&self) -> Range<f64> {
        let (min, max) = match self.points().map(|(t, _)| *t).minmax().into_option() {
            Some(bounds) => bounds,
            None => return 0.0..1.0,
        };
        let (min, max) = (min as f64, max as f64);
        if min == max {
            return (min - 1.0)..(max + 1.0);
        }
        let pad = (max - min) * 0.05;
        (min - pad)..(max + pad)
    }

    pub fn y_range(&self) -> Range<f64> {
        y_range(self.points().map(|(_, v)| *v).reduce(f64::max))
    }
}

/// One metric for every strategy at a single thread count.
#[derive(Debug, Clone)]
pub struct BarChart {
    pub threads: u32,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn new(threads: u32, bars: Vec<Bar>) -> Self {
        BarChart { threads, bars }
    }

    pub fn title(&self) -> String {
        format!("P99 Comparison at {} Threads", self.threads)
    }

    pub fn file_name(&self) -> String {
        format!("p99_{}_comparison.png", self.threads)
    }

    pub fn y_range(&self) -> Range<f64> {
        y_range(self.bars.iter().map(|bar| bar.value).reduce(f64::max))
    }
}

pub fn render_line_chart(chart: &LineChart, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(chart.file_name());
    if chart.series.is_empty() {
        warn!("no data for {}, drawing empty axes", chart.metric);
    }
    draw_line_chart(chart, &path).map_err(|e| Error::chart(&path, e))?;
    info!("wrote {}", path.display());
    Ok(path)
}

pub fn render_bar_chart(chart: &BarChart, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(chart.file_name());
    if chart.bars.is_empty() {
        warn!("no rows at {} threads, drawing empty axes", chart.threads);
    }
    draw_bar_chart(chart, &path).map_err(|e| Error::chart(&path, e))?;
    info!("wrote {}", path.display());
    Ok(path)
}

fn draw_line_chart(chart: &LineChart, path: &Path) -> DrawResult {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(chart.title(), (FONT, 28))
        .margin(15)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(chart.x_range(), chart.y_range())?;

    ctx.configure_mesh()
        .axis_desc_style((FONT, 16))
        .x_desc("Threads")
        .y_desc("Latency (ms)")
        .x_label_formatter(&|x| format!("{:.0}", x))
        .draw()?;

    for (idx, series) in chart.series.iter().enumerate() {
        debug!(strategy = %series.strategy, points = series.points.len(), "drawing series");
        let color = Palette99::pick(idx).to_rgba();
        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|(threads, value)| (*threads as f64, *value))
            .collect();
        ctx.draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(series.strategy.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        ctx.draw_series(
            points
                .iter()
                .map(|point| Circle::new(*point, 4, color.filled())),
        )?;
    }

    if !chart.series.is_empty() {
        ctx.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, 14))
            .draw()?;
    }
    root.present()?;
    Ok(())
}

fn draw_bar_chart(chart: &BarChart, path: &Path) -> DrawResult {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let names: Vec<&str> = chart.bars.iter().map(|bar| bar.strategy.as_str()).collect();
    let slots = names.len().max(1) as u32;

    let mut ctx = ChartBuilder::on(&root)
        .caption(chart.title(), (FONT, 28))
        .margin(15)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d((0u32..slots).into_segmented(), chart.y_range())?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .axis_desc_style((FONT, 16))
        .y_desc("P99 Latency (ms)")
        .x_labels(names.len().max(1))
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(idx) | SegmentValue::Exact(idx) => names
                .get(*idx as usize)
                .map(|name| name.to_string())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    ctx.draw_series(
        Histogram::vertical(&ctx)
            .style(BLUE.mix(0.7).filled())
            .margin(20)
            .data(
                chart
                    .bars
                    .iter()
                    .enumerate()
                    .map(|(idx, bar)| (idx as u32, bar.value)),
            ),
    )?;

    root.present()?;
    Ok(())
}
