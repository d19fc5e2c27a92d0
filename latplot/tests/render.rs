//! These draw text, so they return early on hosts without a usable system font.

use latplot::{
    chart::{render_bar_chart, render_line_chart, BarChart, LineChart},
    report, Metric, MetricsTable,
};
use plotters::prelude::*;

const CSV: &str = "\
strategy,threads,avg_ms,p95_ms,p99_ms
stateService,50,100000,150000,250000
stateService,200,300000,450000,600000
optimisticService,50,500000,700000,900000
optimisticService,200,1500000,2500000,4000000
pessimisticService,200,2000000,3000000,5000000
";

fn fonts_available() -> bool {
    let found = ("sans-serif", 12).into_font().box_size("0").is_ok();
    if !found {
        eprintln!("no sans-serif font, skipping");
    }
    found
}

fn table() -> MetricsTable {
    MetricsTable::from_reader(CSV.as_bytes()).unwrap()
}

fn files_in(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[test]
fn one_image_per_metric() {
    if !fonts_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let table = table();
    for metric in Metric::ALL {
        let path = render_line_chart(&LineChart::new(metric, table.series(metric)), dir.path())
            .unwrap();
        assert_eq!(path, dir.path().join(format!("{metric}.png")));
    }
    assert_eq!(files_in(dir.path()), 3);
}

#[test]
fn empty_line_chart_still_written() {
    if !fonts_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let path = render_line_chart(&LineChart::new(Metric::AvgMs, vec![]), dir.path()).unwrap();
    assert!(path.exists());
    assert_eq!(files_in(dir.path()), 1);
}

#[test]
fn single_comparison_image() {
    if !fonts_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let table = table();
    let chart = BarChart::new(200, table.bars_at(200, Metric::P99Ms));
    assert_eq!(chart.bars.len(), 3);
    let path = render_bar_chart(&chart, dir.path()).unwrap();
    assert!(path.ends_with("p99_200_comparison.png"));
    assert_eq!(files_in(dir.path()), 1);

    // no rows at this thread count still yields an image
    let empty = BarChart::new(7, table.bars_at(7, Metric::P99Ms));
    assert!(render_bar_chart(&empty, dir.path()).unwrap().exists());
}

#[test]
fn plot_metrics_selected_metric_and_dump() {
    if !fonts_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("charts");
    let dump = dir.path().join("series.json");
    let images = report::plot_metrics(&table(), &[Metric::P95Ms], &out, Some(&dump)).unwrap();
    assert_eq!(images, vec![out.join("p95_ms.png")]);
    assert_eq!(files_in(&out), 1);
    assert!(dump.exists());
}

#[test]
fn plot_p99_compare_writes_one_image() {
    if !fonts_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let path = report::plot_p99_compare(&table(), 200, dir.path()).unwrap();
    assert_eq!(path, dir.path().join("p99_200_comparison.png"));
    assert_eq!(files_in(dir.path()), 1);
}
