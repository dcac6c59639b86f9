//! In-memory record store — the last-known-good record set, partitioned by
//! normalized account id for lock-free concurrent access.

use adpulse_core::types::{normalize_account_id, MetricRecord};
use dashmap::DashMap;

/// Partition used for records that carry no account id.
const UNSCOPED: &str = "unscoped";

pub struct RecordStore {
    partitions: DashMap<String, Vec<MetricRecord>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            partitions: DashMap::new(),
        }
    }

    fn partition_key(record: &MetricRecord) -> String {
        record
            .account_id
            .as_deref()
            .map(normalize_account_id)
            .unwrap_or(UNSCOPED)
            .to_string()
    }

    /// Append records to their account partitions.
    pub fn append(&self, records: Vec<MetricRecord>) {
        for record in records {
            self.partitions
                .entry(Self::partition_key(&record))
                .or_default()
                .push(record);
        }
    }

    /// Replace the whole store with a freshly fetched record set.
    pub fn replace_all(&self, records: Vec<MetricRecord>) {
        self.partitions.clear();
        self.append(records);
    }

    /// Snapshot of every stored record across partitions.
    pub fn all(&self) -> Vec<MetricRecord> {
        self.partitions
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.partitions.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
