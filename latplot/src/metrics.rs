use std::{
    fmt::{self, Display},
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use clap::ValueEnum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{Error, Result, NANOS_PER_MILLI};

/// The latency columns of `metrics.csv`.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum Metric {
    #[value(name = "avg_ms")]
    #[serde(rename = "avg_ms")]
    AvgMs,
    #[value(name = "p95_ms")]
    #[serde(rename = "p95_ms")]
    P95Ms,
    #[value(name = "p99_ms")]
    #[serde(rename = "p99_ms")]
    P99Ms,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::AvgMs, Metric::P95Ms, Metric::P99Ms];

    /// Column header, also used as the stem of the chart file.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::AvgMs => "avg_ms",
            Metric::P95Ms => "p95_ms",
            Metric::P99Ms => "p99_ms",
        }
    }

    pub fn value(&self, row: &LatencyRow) -> f64 {
        match self {
            Metric::AvgMs => row.avg_ms,
            Metric::P95Ms => row.p95_ms,
            Metric::P99Ms => row.p99_ms,
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One experiment run: a strategy measured at a thread count.
///
/// Freshly deserialized rows hold nanoseconds; rows inside a [`MetricsTable`]
/// hold milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyRow {
    pub strategy: String,
    pub threads: u32,
    pub avg_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
}

impl LatencyRow {
    /// Latencies must be finite and non-negative; `row` is 1-based, header excluded.
    fn check(&self, row: usize, origin: &Path) -> Result<()> {
        for metric in Metric::ALL {
            let value = metric.value(self);
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Latency {
                    path: origin.to_path_buf(),
                    row,
                    column: metric.column(),
                    value,
                });
            }
        }
        Ok(())
    }

    fn into_millis(self) -> Self {
        LatencyRow {
            avg_ms: self.avg_ms / NANOS_PER_MILLI,
            p95_ms: self.p95_ms / NANOS_PER_MILLI,
            p99_ms: self.p99_ms / NANOS_PER_MILLI,
            ..self
        }
    }
}

/// Points of one strategy, ordered by thread count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub strategy: String,
    pub points: Vec<(u32, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub strategy: String,
    pub value: f64,
}

/// All rows of a metrics file, latencies already converted to milliseconds.
#[derive(Debug, Clone, Default)]
pub struct MetricsTable {
    rows: Vec<LatencyRow>,
}

impl MetricsTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("loading metrics from {}", path.display());
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Self::read_csv(BufReader::new(file), path)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::read_csv(reader, Path::new("<reader>"))
    }

    fn read_csv<R: Read>(reader: R, origin: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut rows = vec![];
        for (idx, record) in reader.deserialize::<LatencyRow>().enumerate() {
            let row = record.map_err(|e| Error::csv(origin, e))?;
            row.check(idx + 1, origin)?;
            rows.push(row.into_millis());
        }
        debug!("read {} rows from {}", rows.len(), origin.display());
        Ok(MetricsTable { rows })
    }

    pub fn rows(&self) -> &[LatencyRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct strategies in order of first appearance.
    pub fn strategies(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.strategy.as_str()).unique().collect()
    }

    pub fn series(&self, metric: Metric) -> Vec<Series> {
        self.strategies()
            .into_iter()
            .map(|strategy| {
                let points = self
                    .rows
                    .iter()
                    .filter(|row| row.strategy == strategy)
                    .map(|row| (row.threads, metric.value(row)))
                    .sorted_by_key(|(threads, _)| *threads)
                    .collect();
                Series {
                    strategy: strategy.to_string(),
                    points,
                }
            })
            .collect()
    }

    pub fn at_threads(&self, threads: u32) -> Vec<&LatencyRow> {
        self.rows.iter().filter(|row| row.threads == threads).collect()
    }

    /// One bar per strategy measured at `threads`; a repeated strategy keeps its last row.
    pub fn bars_at(&self, threads: u32, metric: Metric) -> Vec<Bar> {
        let mut bars: Vec<Bar> = Vec::new();
        for row in self.at_threads(threads) {
            let value = metric.value(row);
            match bars.iter_mut().find(|bar| bar.strategy == row.strategy) {
                Some(bar) => {
                    warn!(
                        "strategy {} has more than one row at {} threads, using the last one",
                        row.strategy, threads
                    );
                    bar.value = value;
                }
                None => bars.push(Bar {
                    strategy: row.strategy.clone(),
                    value,
                }),
            }
        }
        bars
    }
}
