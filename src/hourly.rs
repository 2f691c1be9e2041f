//! Hourly-hash aggregator: per hour of day, how often each content hash
//! was seen.

use std::collections::HashMap;

use crate::clock::Clock;
use crate::error::ContractError;
use crate::ingest::RecordSink;
use crate::models::FileRecord;

/// Maps hour of day to a hash → occurrence count table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HourlyHashIndex {
    clock: Clock,
    by_hour: HashMap<u32, HashMap<String, u64>>,
}

impl HourlyHashIndex {
    /// An empty index that reads hours in `clock`.
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            by_hour: HashMap::new(),
        }
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Count one sighting of `sha` in `hour`.
    pub fn insert(&mut self, hour: u32, sha: &str) {
        *self
            .by_hour
            .entry(hour)
            .or_default()
            .entry(sha.to_string())
            .or_insert(0) += 1;
    }

    pub fn ingest(&mut self, record: &FileRecord) -> Result<(), ContractError> {
        let hour = self.clock.hour_of_day(record.timestamp)?;
        self.insert(hour, &record.sha);
        Ok(())
    }

    /// Hours that saw at least one record, each with its hash counts.
    /// Neither level is ordered.
    pub fn counts(&self) -> impl Iterator<Item = (u32, &HashMap<String, u64>)> + '_ {
        self.by_hour.iter().map(|(hour, hashes)| (*hour, hashes))
    }

    pub fn hour(&self, hour: u32) -> Option<&HashMap<String, u64>> {
        self.by_hour.get(&hour)
    }

    pub fn count(&self, hour: u32, sha: &str) -> u64 {
        self.hour(hour)
            .and_then(|hashes| hashes.get(sha))
            .copied()
            .unwrap_or(0)
    }

    /// Total records counted across all hours.
    pub fn total(&self) -> u64 {
        self.by_hour.values().flat_map(HashMap::values).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hour.is_empty()
    }
}

impl RecordSink for HourlyHashIndex {
    fn accept(&mut self, record: &FileRecord) -> Result<(), ContractError> {
        self.ingest(record)
    }
}
