//! The record cache for one record kind

use crate::record::Record;
use crate::target::Target;
use std::ops::{Index, IndexMut};

/// Position of a record in the store.
///
/// Valid until the next [`RecordStore::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(usize);

/// Every record parsed or flushed since the last prefetch, in file order.
///
/// Records are never removed individually; a record set to absent stays
/// until the store is rebuilt.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn push(&mut self, record: Record) -> RecordId {
        self.records.push(record);
        RecordId(self.records.len() - 1)
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.0)
    }

    /// Record of `kind` named `name`.
    pub fn find(&self, kind: &str, name: &str) -> Option<RecordId> {
        self.records
            .iter()
            .position(|r| r.record_kind == kind && r.name == name)
            .map(RecordId)
    }

    /// Whether a named record with this name is cached.
    ///
    /// Comment and blank lines carry no name and never match.
    pub fn contains(&self, name: &str) -> bool {
        !name.is_empty() && self.records.iter().any(|r| r.name == name)
    }

    /// Records assigned to `target`, in the order they were added.
    pub fn target_records<'a>(&'a self, target: &'a Target) -> impl Iterator<Item = &'a Record> + 'a {
        self.records
            .iter()
            .filter(move |r| r.target.as_ref() == Some(target))
    }

    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records.iter().filter(move |r| r.record_kind == kind)
    }

    /// Ids of the records added at or after `start`.
    pub(crate) fn ids_from(&self, start: usize) -> impl Iterator<Item = RecordId> {
        (start..self.records.len()).map(RecordId)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Index<RecordId> for RecordStore {
    type Output = Record;

    fn index(&self, id: RecordId) -> &Record {
        &self.records[id.0]
    }
}

impl IndexMut<RecordId> for RecordStore {
    fn index_mut(&mut self, id: RecordId) -> &mut Record {
        &mut self.records[id.0]
    }
}
