//! Row flattening
//!
//! A persisted row is the timestamp, the four stage 1 columns in fixed
//! order, then every other recorded key in lexicographic order.

use chrono::NaiveDateTime;
use readiness_core::AnswerRecord;

/// Columns that always lead the row, empty when absent
pub const FIXED_COLUMNS: [&str; 4] = ["Registration Code", "Age Group", "Gender", "KK Number"];

/// Timestamp column format
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One flattened record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Formatted submission time
    pub timestamp: String,
    /// `(key, value)` pairs in column order
    pub fields: Vec<(String, String)>,
}

impl Row {
    /// Cell values in column order, timestamp first
    pub fn values(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.timestamp.as_str()).chain(self.fields.iter().map(|(_, v)| v.as_str()))
    }
}

/// Flatten `record` as of `at`
#[must_use]
pub fn flatten(record: &AnswerRecord, at: NaiveDateTime) -> Row {
    let mut fields: Vec<(String, String)> = FIXED_COLUMNS
        .iter()
        .map(|key| (key.to_string(), record.get(key).unwrap_or_default().to_string()))
        .collect();

    let mut rest: Vec<(&str, &str)> = record
        .iter()
        .filter(|(key, _)| !FIXED_COLUMNS.contains(key))
        .collect();
    rest.sort_unstable_by(|a, b| a.0.cmp(b.0));
    fields.extend(rest.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));

    Row {
        timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
        fields,
    }
}
