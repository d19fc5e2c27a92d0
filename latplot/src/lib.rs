pub mod chart;
pub mod error;
pub mod metrics;
pub mod report;
pub mod summary;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub use error::{Error, Result};
pub use metrics::{Bar, LatencyRow, Metric, MetricsTable, Series};
pub use summary::LatencySummary;

/// The experiment writes latencies in nanoseconds under `*_ms` headers.
pub const NANOS_PER_MILLI: f64 = 1_000_000.0;

pub fn init_logger() {
    tracing_subscriber::fmt::SubscriberBuilder::default()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
}
