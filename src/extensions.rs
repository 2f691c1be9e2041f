//! Extension aggregator: distinct filename stems per extension.

use std::collections::{HashMap, HashSet};

use crate::error::ContractError;
use crate::filename::split_file_name;
use crate::ingest::RecordSink;
use crate::models::FileRecord;

/// Maps each extension to the set of stems seen with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionIndex {
    stems_by_ext: HashMap<String, HashSet<String>>,
}

impl ExtensionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `stem` was seen with extension `ext`.
    pub fn insert(&mut self, ext: &str, stem: &str) {
        self.stems_by_ext
            .entry(ext.to_string())
            .or_default()
            .insert(stem.to_string());
    }

    /// Split the record's filename and record its stem under its extension.
    pub fn ingest(&mut self, record: &FileRecord) -> Result<(), ContractError> {
        let (stem, ext) = split_file_name(&record.file_name)?;
        self.insert(ext, stem);
        Ok(())
    }

    /// `(extension, distinct stem count)` pairs, in no particular order.
    pub fn counts(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.stems_by_ext
            .iter()
            .map(|(ext, stems)| (ext.as_str(), stems.len()))
    }

    pub fn count(&self, ext: &str) -> Option<usize> {
        self.stems_by_ext.get(ext).map(HashSet::len)
    }

    /// Number of distinct extensions.
    pub fn len(&self) -> usize {
        self.stems_by_ext.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems_by_ext.is_empty()
    }
}

impl RecordSink for ExtensionIndex {
    fn accept(&mut self, record: &FileRecord) -> Result<(), ContractError> {
        self.ingest(record)
    }
}
