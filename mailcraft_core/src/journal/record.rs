use super::event::{BuilderEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalRecord {
    pub metadata: EventMetadata,
    pub event: BuilderEvent,
}

impl fmt::Display for JournalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] r{} {}",
            self.metadata.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.metadata.revision,
            self.event
        )
    }
}

/// Bounded history of builder events; the oldest record is dropped once
/// capacity is reached
#[derive(Debug, Clone)]
pub struct EventJournal {
    records: VecDeque<JournalRecord>,
    capacity: usize,
    revision: u64,
}

impl EventJournal {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            revision: 0,
        }
    }

    /// Record an event, bumping the revision when it changed the document
    pub fn append(&mut self, event: BuilderEvent) -> &JournalRecord {
        if event.mutates_document() {
            self.revision += 1;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(JournalRecord {
            metadata: EventMetadata::new(self.revision),
            event,
        });
        &self.records[self.records.len() - 1]
    }

    /// Number of document-changing events seen so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&JournalRecord> {
        self.records.back()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &JournalRecord> + '_ {
        self.records.iter()
    }

    pub fn all(&self) -> Vec<JournalRecord> {
        self.records.iter().cloned().collect()
    }
}

impl Default for EventJournal {
    fn default() -> Self {
        Self::new(256)
    }
}
