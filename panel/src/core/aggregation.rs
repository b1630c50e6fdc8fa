//! Multi-host status aggregation
//!
//! One entry per launcher host, replaced wholesale on every ingest. Entries
//! expire once they have not been refreshed for longer than the staleness
//! threshold. Hosts are kept sorted by id so reads are deterministic.
//! Records are opaque JSON objects; the store only adds `hostId` on read.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde_json::Value;

use super::validation::BotRecord;

/// Default staleness threshold for a host entry
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
struct AggregationEntry {
    records: Vec<BotRecord>,
    last_update: Instant,
}

#[derive(Debug)]
pub struct AggregationStore {
    entries: BTreeMap<String, AggregationEntry>,
    stale_after: Duration,
}

impl AggregationStore {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: BTreeMap::new(),
            stale_after,
        }
    }

    /// Replace the records of `host_id`
    ///
    /// An empty record list is kept: the host is known but runs no bots.
    pub fn ingest(&mut self, host_id: impl Into<String>, records: Vec<BotRecord>, now: Instant) {
        self.entries.insert(
            host_id.into(),
            AggregationEntry {
                records,
                last_update: now,
            },
        );
    }

    /// Drop hosts not refreshed within the threshold, returning their ids
    pub fn sweep(&mut self, now: Instant) -> Vec<String> {
        let stale_after = self.stale_after;
        let mut removed = Vec::new();

        self.entries.retain(|host_id, entry| {
            let fresh = now.saturating_duration_since(entry.last_update) <= stale_after;
            if !fresh {
                removed.push(host_id.clone());
            }
            fresh
        });

        removed
    }

    /// Sweep, then flatten every remaining record tagged with its host
    ///
    /// The owning host overwrites any `hostId` field a record carried.
    pub fn read_all(&mut self, now: Instant) -> Vec<Value> {
        self.sweep(now);

        self.entries
            .iter()
            .flat_map(|(host_id, entry)| {
                entry.records.iter().map(move |record| {
                    let mut record = record.clone();
                    record.insert("hostId".to_string(), Value::String(host_id.clone()));
                    Value::Object(record)
                })
            })
            .collect()
    }

    pub fn host_count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for AggregationStore {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_AFTER)
    }
}
