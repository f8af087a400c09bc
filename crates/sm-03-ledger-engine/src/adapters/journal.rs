//! In-memory `EventSink` collecting every published record.

use crate::events::{EventRecord, OperationName};
use crate::ports::EventSink;
use parking_lot::RwLock;
use shared_types::AgentId;

#[derive(Debug, Default)]
pub struct InMemoryJournal {
    records: RwLock<Vec<EventRecord>>,
}

impl InMemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Copy of all records in publication order.
    pub fn records(&self) -> Vec<EventRecord> {
        self.records.read().clone()
    }

    /// Records of one operation.
    pub fn by_operation(&self, operation: OperationName) -> Vec<EventRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.operation == operation)
            .cloned()
            .collect()
    }

    /// Records involving `agent`.
    pub fn involving(&self, agent: &AgentId) -> Vec<EventRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.agents.contains(agent))
            .cloned()
            .collect()
    }
}

impl EventSink for InMemoryJournal {
    fn publish(&self, record: &EventRecord) {
        self.records.write().push(record.clone());
    }
}
