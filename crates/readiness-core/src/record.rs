//! Answer storage
//!
//! [`StageAnswers`] holds one stage's in-progress selections; the
//! [`AnswerRecord`] accumulates validated stages for the whole session.
//! Neither type validates anything.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Selections submitted for a single stage, not yet validated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageAnswers(IndexMap<String, String>);

impl StageAnswers {
    /// Create empty answers
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[inline]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set one answer, replacing any previous value
    #[inline]
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get one answer
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of answers
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no answers were given
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StageAnswers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Accumulated answers for one respondent session
///
/// Equality ignores insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerRecord {
    entries: IndexMap<String, String>,
}

impl AnswerRecord {
    /// Create an empty record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer stored under `key`
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether `key` has been recorded
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Overwrite exactly the keys present in `partial`
    pub fn merge(&mut self, partial: &StageAnswers) {
        for (key, value) in partial.iter() {
            self.entries.insert(key.to_string(), value.to_string());
        }
    }

    /// Keep only the keys for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|key, _| keep(key));
    }

    /// Drop every answer
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate in the order keys were first recorded
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Recorded keys in first-recorded order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of recorded answers
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn merge_overwrites_only_given_keys() {
        let mut record = AnswerRecord::new();
        record.merge(&StageAnswers::new().with("Gender", "Male").with("KK Number", "2"));
        record.merge(&StageAnswers::new().with("KK Number", "5"));

        assert_eq!(record.get("Gender"), Some("Male"));
        assert_eq!(record.get("KK Number"), Some("5"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn clear_empties_record() {
        let mut record = AnswerRecord::new();
        record.merge(&StageAnswers::new().with("fe1", "Other"));
        record.clear();
        assert!(record.is_empty());
        assert_eq!(record.get("fe1"), None);
    }

    #[test]
    fn retain_drops_rejected_keys() {
        let mut record: AnswerRecord = AnswerRecord::new();
        record.merge(&[("s1", "a"), ("family1", "b")].into_iter().collect());
        record.retain(|k| k.starts_with('s'));
        assert!(record.contains("s1"));
        assert!(!record.contains("family1"));
    }

    #[test]
    fn stage_answers_deserialize_from_plain_map() {
        let answers: StageAnswers = serde_json::from_str(r#"{"fe1":"Other","fe2":"Sports"}"#).unwrap();
        assert_eq!(answers.get("fe2"), Some("Sports"));
        assert_eq!(answers.iter().next(), Some(("fe1", "Other")));
    }

    fn answers_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::vec(("[a-z]{1,4}", "[A-Za-z ]{0,6}"), 0..8)
    }

    proptest! {
        #[test]
        fn prop_merge_is_idempotent(pairs in answers_strategy(), base in answers_strategy()) {
            let partial: StageAnswers = pairs.into_iter().collect();
            let mut record = AnswerRecord::new();
            record.merge(&base.into_iter().collect());

            let mut once = record.clone();
            once.merge(&partial);
            let mut twice = once.clone();
            twice.merge(&partial);

            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_merge_is_associative_over_disjoint_stages(a in answers_strategy(), b in answers_strategy()) {
            let a: StageAnswers = a.into_iter().map(|(k, v)| (format!("a_{k}"), v)).collect();
            let b: StageAnswers = b.into_iter().map(|(k, v)| (format!("b_{k}"), v)).collect();

            let mut ab = AnswerRecord::new();
            ab.merge(&a);
            ab.merge(&b);

            let mut ba = AnswerRecord::new();
            ba.merge(&b);
            ba.merge(&a);

            prop_assert_eq!(ab, ba);
        }
    }
}
