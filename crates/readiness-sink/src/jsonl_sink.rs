//! JSON-lines file sink

use crate::csv_sink::open_append;
use crate::row::{self, Row};
use chrono::{Local, NaiveDateTime};
use indexmap::IndexMap;
use parking_lot::Mutex;
use readiness_core::{AnswerRecord, PersistenceError, PersistenceSink, CATALOG_VERSION};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct JsonRow<'a> {
    timestamp: &'a str,
    catalog_version: &'a str,
    fields: IndexMap<&'a str, &'a str>,
}

impl<'a> From<&'a Row> for JsonRow<'a> {
    fn from(row: &'a Row) -> Self {
        Self {
            timestamp: &row.timestamp,
            catalog_version: CATALOG_VERSION,
            fields: row.fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect(),
        }
    }
}

/// Appends one JSON object per finished record
#[derive(Debug)]
pub struct JsonLinesSink {
    path: PathBuf,
    fixed_time: Option<NaiveDateTime>,
    write_lock: Mutex<()>,
}

impl JsonLinesSink {
    /// Sink writing to `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fixed_time: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Stamp every row with `at`
    #[inline]
    #[must_use]
    pub fn with_fixed_time(mut self, at: NaiveDateTime) -> Self {
        self.fixed_time = Some(at);
        self
    }

    /// Destination file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceSink for JsonLinesSink {
    fn append(&self, record: &AnswerRecord) -> Result<(), PersistenceError> {
        let at = self.fixed_time.unwrap_or_else(|| Local::now().naive_local());
        let row = row::flatten(record, at);
        let mut line = serde_json::to_vec(&JsonRow::from(&row)).map_err(|e| PersistenceError::Backend {
            backend: "jsonl",
            message: e.to_string(),
        })?;
        line.push(b'\n');

        let _guard = self.write_lock.lock();
        let mut file = open_append(&self.path)?;
        file.write_all(&line)?;
        file.flush()?;
        tracing::debug!("Appended JSON row to {}", self.path.display());
        Ok(())
    }
}
