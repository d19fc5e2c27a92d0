use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("row {row} of {path}: {column} = {value} is not a latency")]
    Latency {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: f64,
    },
    #[error("json error writing {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// plotters errors are generic over the backend, so only the message is kept
    #[error("failed to draw {path}: {message}")]
    Chart { path: PathBuf, message: String },
    #[error("line {line}: `{value}` is not a nanosecond sample")]
    Sample { line: usize, value: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Error::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn chart(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Error::Chart {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
