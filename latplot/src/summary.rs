//! Reduce raw per-request latencies to one `metrics.csv` row.

use std::{
    fs::{File, OpenOptions},
    io::{BufRead, BufReader},
    iter::Sum,
    ops::Add,
    path::Path,
};

use serde::Serialize;
use tracing::{debug, info};

use crate::{Error, Result};

/// Nearest-rank percentile over an ascending slice.
pub fn percentile(sorted: &[u64], p: f64) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let rank = (p * sorted.len() as f64).ceil() as i64 - 1;
    let idx = rank.clamp(0, sorted.len() as i64 - 1) as usize;
    sorted[idx]
}

/// count, total, max in nanoseconds
#[derive(Debug, Clone, Copy, Default)]
struct Totals(u64, u128, u64);

impl Add for Totals {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Totals(self.0 + rhs.0, self.1 + rhs.1, self.2.max(rhs.2))
    }
}

impl Sum for Totals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Totals::default(), |a, b| a + b)
    }
}

impl From<u64> for Totals {
    fn from(sample: u64) -> Self {
        Totals(1, sample as u128, sample)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LatencySummary {
    pub count: u64,
    pub avg_ns: u64,
    pub max_ns: u64,
    pub p95_ns: u64,
    pub p99_ns: u64,
}

impl LatencySummary {
    pub fn from_samples(samples: &[u64]) -> Self {
        if samples.is_empty() {
            return LatencySummary::default();
        }
        let Totals(count, total, max) = samples.iter().copied().map(Totals::from).sum::<Totals>();
        let mut sorted = samples.to_vec();
        sorted.sort_unstable();
        LatencySummary {
            count,
            avg_ns: (total / count as u128) as u64,
            max_ns: max,
            p95_ns: percentile(&sorted, 0.95),
            p99_ns: percentile(&sorted, 0.99),
        }
    }
}

/// Row layout of `metrics.csv`; the `_ms` columns carry nanoseconds.
#[derive(Debug, Serialize)]
struct MetricsRecord<'a> {
    strategy: &'a str,
    threads: u32,
    avg_ms: u64,
    p95_ms: u64,
    p99_ms: u64,
}

/// Read one nanosecond sample per line, skipping blank lines.
pub fn read_samples(path: impl AsRef<Path>) -> Result<Vec<u64>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut samples = vec![];
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| Error::io(path, e))?;
        let value = line.trim();
        if value.is_empty() {
            continue;
        }
        let sample = value.parse::<u64>().map_err(|_| Error::Sample {
            line: idx + 1,
            value: value.to_string(),
        })?;
        samples.push(sample);
    }
    debug!("read {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Append a summary row, writing the header only into a new or empty file.
pub fn append_row(
    path: impl AsRef<Path>,
    strategy: &str,
    threads: u32,
    summary: &LatencySummary,
) -> Result<()> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;
    let is_empty = file.metadata().map_err(|e| Error::io(path, e))?.len() == 0;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_empty)
        .from_writer(file);
    writer
        .serialize(MetricsRecord {
            strategy,
            threads,
            avg_ms: summary.avg_ns,
            p95_ms: summary.p95_ns,
            p99_ms: summary.p99_ns,
        })
        .map_err(|e| Error::csv(path, e))?;
    writer.flush().map_err(|e| Error::io(path, e))?;
    info!(
        "appended {} @ {} threads to {}",
        strategy,
        threads,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_rank_percentile() {
        let sorted: Vec<u64> = (1..=100).collect();
        assert_eq!(percentile(&sorted, 0.95), 95);
        assert_eq!(percentile(&sorted, 0.99), 99);
        assert_eq!(percentile(&sorted, 0.0), 1);
        assert_eq!(percentile(&sorted, 1.0), 100);
        assert_eq!(percentile(&[7], 0.99), 7);
        assert_eq!(percentile(&[], 0.95), 0);
    }

    #[test]
    fn small_sample_percentile_rounds_up() {
        // ceil(0.95 * 10) - 1 = 9
        let sorted: Vec<u64> = (10..20).collect();
        assert_eq!(percentile(&sorted, 0.95), 19);
        // ceil(0.5 * 10) - 1 = 4
        assert_eq!(percentile(&sorted, 0.5), 14);
    }

    #[test]
    fn summary_of_unsorted_samples() {
        let summary = LatencySummary::from_samples(&[30, 10, 20, 41]);
        assert_eq!(
            summary,
            LatencySummary {
                count: 4,
                avg_ns: 25,
                max_ns: 41,
                p95_ns: 41,
                p99_ns: 41,
            }
        );
    }

    #[test]
    fn empty_summary_is_zero() {
        assert_eq!(LatencySummary::from_samples(&[]), LatencySummary::default());
    }

    #[test]
    fn average_truncates() {
        assert_eq!(LatencySummary::from_samples(&[1, 2]).avg_ns, 1);
    }
}
