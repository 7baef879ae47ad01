#![forbid(unsafe_code)]

//! Content feed normalization.
//!
//! The CMS emits `contents` either as an array or as an object keyed by entry
//! id. Both become one ordered list. Object feeds are ordered the way a
//! JavaScript engine enumerates object keys: integer-like keys ascending,
//! then the remaining keys in document order. Later title sorting is stable,
//! so this order decides ties between equal titles.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::entry::ContentEntry;

/// Errors that make the whole feed unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    Json(String),
    /// Neither an array nor an object.
    NotAFeed,
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "invalid content feed: {msg}"),
            Self::NotAFeed => write!(f, "content feed must be an array or an object"),
        }
    }
}

impl std::error::Error for FeedError {}

/// Entries in feed order.
#[derive(Debug, Clone, Default)]
pub struct ContentFeed {
    entries: Vec<Arc<ContentEntry>>,
    by_id: HashMap<String, usize>,
}

impl ContentFeed {
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = ContentEntry>) -> Self {
        let mut feed = Self::default();
        for entry in entries {
            feed.push(entry);
        }
        feed
    }

    /// Normalize a decoded `contents` value. `null` is an empty feed.
    pub fn from_value(value: &Value) -> Result<Self, FeedError> {
        let mut feed = Self::default();
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for (position, item) in items.iter().enumerate() {
                    feed.push_raw(item, None, position);
                }
            }
            Value::Object(map) => {
                for (position, (key, item)) in js_key_order(map).into_iter().enumerate() {
                    feed.push_raw(item, Some(key), position);
                }
            }
            _ => return Err(FeedError::NotAFeed),
        }
        Ok(feed)
    }

    pub fn from_json_str(text: &str) -> Result<Self, FeedError> {
        let value: Value =
            serde_json::from_str(text).map_err(|err| FeedError::Json(err.to_string()))?;
        Self::from_value(&value)
    }

    fn push_raw(&mut self, item: &Value, key: Option<&str>, position: usize) {
        match ContentEntry::from_value(item, key) {
            Ok(entry) => self.push(entry),
            Err(reason) => {
                warn!(target: "kartan.content", position, key, reason = reason.as_str(), "dropping entry");
            }
        }
    }

    fn push(&mut self, entry: ContentEntry) {
        let position = self.entries.len();
        if self.by_id.contains_key(&entry.id) {
            warn!(target: "kartan.content", id = %entry.id, "duplicate entry id");
        } else {
            self.by_id.insert(entry.id.clone(), position);
        }
        self.entries.push(Arc::new(entry));
    }

    #[inline]
    pub fn entries(&self) -> &[Arc<ContentEntry>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ContentEntry>> {
        self.entries.iter()
    }

    /// First entry carrying `id`.
    pub fn get(&self, id: &str) -> Option<&Arc<ContentEntry>> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical array index: `0`, or digits without a leading zero, below 2^32 - 1.
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|&n| n != u32::MAX)
}

fn js_key_order(map: &serde_json::Map<String, Value>) -> Vec<(&str, &Value)> {
    let mut indexed: Vec<(u32, &str, &Value)> = Vec::new();
    let mut named: Vec<(&str, &Value)> = Vec::new();
    for (key, value) in map {
        match array_index(key) {
            Some(n) => indexed.push((n, key.as_str(), value)),
            None => named.push((key.as_str(), value)),
        }
    }
    indexed.sort_by_key(|(n, _, _)| *n);
    indexed
        .into_iter()
        .map(|(_, key, value)| (key, value))
        .chain(named)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(feed: &ContentFeed) -> Vec<&str> {
        feed.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn array_keeps_order() {
        let feed = ContentFeed::from_json_str(
            r#"[{"id":3,"type":"region","feature_id":"01"},{"id":1,"type":"region","feature_id":"02"}]"#,
        )
        .unwrap();
        assert_eq!(ids(&feed), ["3", "1"]);
    }

    #[test]
    fn object_uses_js_key_order() {
        let feed = ContentFeed::from_json_str(
            r#"{
                "b": {"type":"region","feature_id":"01"},
                "10": {"type":"region","feature_id":"01"},
                "2": {"type":"region","feature_id":"01"},
                "a": {"type":"region","feature_id":"01"},
                "01": {"type":"region","feature_id":"01"}
            }"#,
        )
        .unwrap();
        assert_eq!(ids(&feed), ["2", "10", "b", "a", "01"]);
    }

    #[test]
    fn object_values_with_own_id_keep_it() {
        let feed =
            ContentFeed::from_json_str(r#"{"7": {"id": 70, "type":"region","feature_id":"01"}}"#)
                .unwrap();
        assert_eq!(ids(&feed), ["70"]);
        assert!(feed.get("70").is_some());
        assert!(feed.get("7").is_none());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let feed = ContentFeed::from_json_str(
            r#"[{"id":1,"type":"region"},{"id":2,"type":"region","feature_id":"01"},42]"#,
        )
        .unwrap();
        assert_eq!(ids(&feed), ["2"]);
    }

    #[test]
    fn null_is_empty_and_scalars_are_rejected() {
        assert!(ContentFeed::from_value(&Value::Null).unwrap().is_empty());
        assert_eq!(
            ContentFeed::from_value(&Value::Bool(true)).unwrap_err(),
            FeedError::NotAFeed
        );
        assert!(matches!(ContentFeed::from_json_str("[").unwrap_err(), FeedError::Json(_)));
    }

    #[test]
    fn duplicate_ids_resolve_to_first() {
        let feed = ContentFeed::from_entries([
            ContentEntry::region("1", "01", "Först"),
            ContentEntry::region("1", "02", "Sen"),
        ]);
        assert_eq!(feed.len(), 2);
        assert_eq!(feed.get("1").unwrap().title, "Först");
    }

    #[test]
    fn array_index_rules() {
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("42"), Some(42));
        assert_eq!(array_index("042"), None);
        assert_eq!(array_index("-1"), None);
        assert_eq!(array_index("4294967295"), None);
        assert_eq!(array_index(""), None);
    }
}
