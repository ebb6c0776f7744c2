//! Ordered in-memory collections backing each screen's listing.

use shared::domain::{Contact, ContactId, Event, EventGroup, EventGroupId, EventId};

pub trait Record: Clone {
    type Key: Copy + PartialEq + std::fmt::Debug;

    fn key(&self) -> Self::Key;
}

impl Record for Contact {
    type Key = ContactId;

    fn key(&self) -> ContactId {
        self.id
    }
}

impl Record for EventGroup {
    type Key = EventGroupId;

    fn key(&self) -> EventGroupId {
        self.id
    }
}

impl Record for Event {
    type Key = EventId;

    fn key(&self) -> EventId {
        self.id
    }
}

/// Keeps records in insertion or fetch order. Duplicate keys are not rejected.
#[derive(Debug, Clone)]
pub struct CollectionStore<T: Record> {
    records: Vec<T>,
}

impl<T: Record> Default for CollectionStore<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: Record> CollectionStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, records: Vec<T>) {
        self.records = records;
    }

    pub fn append(&mut self, record: T) {
        self.records.push(record);
    }

    /// Drops every record with `key`. Returns whether anything was removed.
    pub fn remove(&mut self, key: T::Key) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.key() != key);
        self.records.len() != before
    }

    /// Swaps the first record with `key` for `record`, keeping its position.
    pub fn replace(&mut self, key: T::Key, record: T) -> bool {
        match self.records.iter_mut().find(|existing| existing.key() == key) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: T::Key) -> Option<&T> {
        self.records.iter().find(|record| record.key() == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
