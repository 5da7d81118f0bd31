//! Readiness Sink - append-only persistence for finished assessments
//!
//! Each finished record becomes one row: timestamp, the stage 1 columns,
//! then the remaining keys sorted. Two file backends are provided:
//! - [`CsvFileSink`]: headerless CSV, one line per record
//! - [`JsonLinesSink`]: one JSON object per line, tagged with the catalog version

pub mod csv_sink;
pub mod jsonl_sink;
pub mod row;

pub use csv_sink::CsvFileSink;
pub use jsonl_sink::JsonLinesSink;
pub use row::{flatten, Row, FIXED_COLUMNS, TIMESTAMP_FORMAT};

use readiness_core::PersistenceSink;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// On-disk row format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkFormat {
    /// Comma separated values
    #[default]
    Csv,
    /// Newline delimited JSON
    Jsonl,
}

/// Unrecognised sink format name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sink format: {0} (expected csv or jsonl)")]
pub struct UnknownFormat(pub String);

impl FromStr for SinkFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "jsonl" | "json-lines" => Ok(Self::Jsonl),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for SinkFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Build the sink for `format` writing to `path`
#[must_use]
pub fn open(format: SinkFormat, path: impl Into<PathBuf>) -> Box<dyn PersistenceSink> {
    let path = path.into();
    tracing::info!("Persisting records as {} to {}", format, path.display());
    match format {
        SinkFormat::Csv => Box::new(CsvFileSink::new(path)),
        SinkFormat::Jsonl => Box::new(JsonLinesSink::new(path)),
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
