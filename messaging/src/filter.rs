//! Log filters built from loosely typed option bags
//!
//! Front-ends hand over a JSON object such as
//!
//! ```json
//! { "earliest": 100, "latest": -1, "address": ["0x01..."], "topics": "0xbeef", "max": 10 }
//! ```
//!
//! and get back a [`LogFilter`] predicate. Missing keys fall back to
//! permissive defaults; a key of the wrong type is an error.

use crate::{
    error::{MessagingError, Result},
    from_hex,
    whisper::Topic,
};
use serde_json::{Map, Value};

/// Block number meaning "the latest block"
pub const LATEST_BLOCK: i64 = -1;

/// Log entry a filter is matched against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Address of the emitting contract
    pub address: Vec<u8>,
    /// Topics of the entry
    pub topics: Vec<Topic>,
    /// Block the entry was included in
    pub block_number: u64,
}

/// Query predicate over [`LogRecord`]s
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    /// First block to include, [`LATEST_BLOCK`] for no lower bound
    pub earliest: i64,
    /// Last block to include, [`LATEST_BLOCK`] for no upper bound
    pub latest: i64,
    /// Accepted emitters; empty accepts every address
    pub addresses: Vec<Vec<u8>>,
    /// Topics that must all be present
    pub topics: Vec<Topic>,
    /// Number of matches to skip
    pub skip: usize,
    /// Maximum number of matches to return, zero for no limit
    pub max: usize,
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            earliest: LATEST_BLOCK,
            latest: LATEST_BLOCK,
            addresses: Vec::new(),
            topics: Vec::new(),
            skip: 0,
            max: 0,
        }
    }
}

impl LogFilter {
    /// Build a filter from a key/value option bag
    pub fn from_map(object: &Map<String, Value>) -> Result<Self> {
        let mut filter = LogFilter::default();

        if let Some(value) = object.get("earliest") {
            filter.earliest = block_number("earliest", value)?;
        }
        if let Some(value) = object.get("latest") {
            filter.latest = block_number("latest", value)?;
        }
        if let Some(value) = object.get("address") {
            filter.addresses = string_list("address", value)?
                .iter()
                .map(|s| from_hex(s))
                .collect::<Result<_>>()?;
        }
        if let Some(value) = object.get("skip") {
            filter.skip = count("skip", value)?;
        }
        if let Some(value) = object.get("max") {
            filter.max = count("max", value)?;
        }
        if let Some(value) = object.get("topics") {
            filter.set_topics(make_topics(value)?);
        }

        Ok(filter)
    }

    /// Replace the topic list
    pub fn set_topics(&mut self, topics: Vec<Topic>) {
        self.topics = topics;
    }

    /// Whether `record` passes the filter
    pub fn matches(&self, record: &LogRecord) -> bool {
        if let Ok(earliest) = u64::try_from(self.earliest) {
            if record.block_number < earliest {
                return false;
            }
        }
        if let Ok(latest) = u64::try_from(self.latest) {
            if record.block_number > latest {
                return false;
            }
        }
        if !self.addresses.is_empty() && !self.addresses.contains(&record.address) {
            return false;
        }
        self.topics.iter().all(|t| record.topics.contains(t))
    }

    /// Matching records, after `skip` and `max` are applied
    pub fn apply<'r>(&self, records: &'r [LogRecord]) -> Vec<&'r LogRecord> {
        let matching = records.iter().filter(|r| self.matches(r)).skip(self.skip);
        if self.max == 0 {
            matching.collect()
        } else {
            matching.take(self.max).collect()
        }
    }
}

/// Topics from either a single string or a list of strings
pub fn make_topics(value: &Value) -> Result<Vec<Topic>> {
    string_list("topics", value)?
        .iter()
        .map(|s| Topic::parse(s))
        .collect()
}

fn invalid(field: &str, reason: &str) -> MessagingError {
    MessagingError::InvalidFilter {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn block_number(field: &str, value: &Value) -> Result<i64> {
    value
        .as_i64()
        .filter(|n| *n >= LATEST_BLOCK)
        .ok_or_else(|| invalid(field, "expected a block number or -1"))
}

fn count(field: &str, value: &Value) -> Result<usize> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| invalid(field, "expected a non-negative integer"))
}

fn string_list(field: &str, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid(field, "expected a list of strings"))
            })
            .collect(),
        _ => Err(invalid(field, "expected a string or a list of strings")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn record(address: u8, block_number: u64, topics: &[&str]) -> LogRecord {
        LogRecord {
            address: vec![address],
            topics: topics.iter().map(|t| Topic(t.as_bytes().to_vec())).collect(),
            block_number,
        }
    }

    #[test]
    fn test_empty_map_matches_everything() {
        let filter = LogFilter::from_map(&Map::new()).unwrap();
        assert_eq!(filter, LogFilter::default());
        assert!(filter.matches(&record(1, 0, &[])));
        assert!(filter.matches(&record(2, u64::MAX, &["a"])));
    }

    #[test]
    fn test_from_map_reads_all_fields() {
        let filter = LogFilter::from_map(&object(json!({
            "earliest": 10,
            "latest": 20,
            "address": ["0x01", "0x02"],
            "skip": 1,
            "max": 2,
            "topics": "0xbeef"
        })))
        .unwrap();

        assert_eq!(filter.earliest, 10);
        assert_eq!(filter.latest, 20);
        assert_eq!(filter.addresses, vec![vec![1], vec![2]]);
        assert_eq!(filter.skip, 1);
        assert_eq!(filter.max, 2);
        assert_eq!(filter.topics, vec![Topic(vec![0xbe, 0xef])]);
    }

    #[test]
    fn test_single_address_string() {
        let filter = LogFilter::from_map(&object(json!({ "address": "0x0a" }))).unwrap();
        assert_eq!(filter.addresses, vec![vec![0x0a]]);
    }

    #[test]
    fn test_topics_list() {
        let topics = make_topics(&json!(["transfer", "0x01"])).unwrap();
        assert_eq!(topics, vec![Topic(b"transfer".to_vec()), Topic(vec![1])]);
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        assert!(matches!(
            LogFilter::from_map(&object(json!({ "topics": 5 }))),
            Err(MessagingError::InvalidFilter { field, .. }) if field == "topics"
        ));
        assert!(matches!(
            LogFilter::from_map(&object(json!({ "earliest": -7 }))),
            Err(MessagingError::InvalidFilter { .. })
        ));
        assert!(matches!(
            LogFilter::from_map(&object(json!({ "max": "ten" }))),
            Err(MessagingError::InvalidFilter { .. })
        ));
        assert!(matches!(
            LogFilter::from_map(&object(json!({ "address": ["0xzz"] }))),
            Err(MessagingError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_matches() {
        let filter = LogFilter {
            earliest: 5,
            latest: 9,
            addresses: vec![vec![1]],
            topics: vec![Topic(b"a".to_vec())],
            ..Default::default()
        };
        assert!(filter.matches(&record(1, 5, &["a", "b"])));
        assert!(filter.matches(&record(1, 9, &["a"])));
        assert!(!filter.matches(&record(1, 4, &["a"])));
        assert!(!filter.matches(&record(1, 10, &["a"])));
        assert!(!filter.matches(&record(2, 6, &["a"])));
        assert!(!filter.matches(&record(1, 6, &["b"])));
    }

    #[test]
    fn test_apply_skip_and_max() {
        let records: Vec<_> = (0..6).map(|n| record(1, n, &["t"])).collect();
        let filter = LogFilter::from_map(&object(json!({ "topics": ["t"], "skip": 1, "max": 3 })))
            .unwrap();

        let blocks: Vec<u64> = filter.apply(&records).iter().map(|r| r.block_number).collect();
        assert_eq!(blocks, vec![1, 2, 3]);
    }
}
