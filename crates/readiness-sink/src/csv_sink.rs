//! CSV file sink

use crate::row::{self, Row};
use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;
use readiness_core::{AnswerRecord, PersistenceError, PersistenceSink};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Appends one headerless CSV row per finished record
#[derive(Debug)]
pub struct CsvFileSink {
    path: PathBuf,
    fixed_time: Option<NaiveDateTime>,
    write_lock: Mutex<()>,
}

impl CsvFileSink {
    /// Sink writing to `path`; the file and its directory are created on first append
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

    fn write_row(&self, row: &Row) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock();
        let file = open_append(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(row.values()).map_err(backend_error)?;
        writer.flush()?;
        Ok(())
    }
}

impl PersistenceSink for CsvFileSink {
    fn append(&self, record: &AnswerRecord) -> Result<(), PersistenceError> {
        let at = self.fixed_time.unwrap_or_else(|| Local::now().naive_local());
        let row = row::flatten(record, at);
        self.write_row(&row)?;
        tracing::debug!("Appended CSV row ({} columns) to {}", row.fields.len() + 1, self.path.display());
        Ok(())
    }
}

/// Open `path` for appending, creating parent directories as needed
pub(crate) fn open_append(path: &Path) -> Result<File, PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

fn backend_error(e: csv::Error) -> PersistenceError {
    PersistenceError::Backend {
        backend: "csv",
        message: e.to_string(),
    }
}
