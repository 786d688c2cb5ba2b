#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use commitgate_contracts::{
    RecordChangedEvent, RecordEventSeq, RecordId, RecordState, RecordValue, Validate,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("{table} is append-only")]
    AppendOnlyViolation { table: &'static str },
}

/// In-memory record substrate: current commitments plus the append-only change ledger.
///
/// Both tables only move together through `commit_record_update`: one write, one ledger row.
#[derive(Debug, Clone)]
pub struct InMemoryRecordStore {
    records: BTreeMap<RecordId, RecordValue>,
    change_ledger: Vec<RecordChangedEvent>,
    next_event_seq: u64,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new_in_memory()
    }
}

impl InMemoryRecordStore {
    pub fn new_in_memory() -> Self {
        Self {
            records: BTreeMap::new(),
            change_ledger: Vec::new(),
            next_event_seq: 1,
        }
    }

    /// Current commitment for `id`; the zero value when the record was never committed.
    pub fn record_value(&self, id: &RecordId) -> RecordValue {
        self.records.get(id).copied().unwrap_or(RecordValue::ZERO)
    }

    pub fn record_state(&self, id: &RecordId) -> RecordState {
        match self.records.get(id) {
            Some(v) => RecordState::Committed(*v),
            None => RecordState::Uncommitted,
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn commit_record_update(
        &mut self,
        id: RecordId,
        previous_value: RecordValue,
        new_value: RecordValue,
    ) -> RecordChangedEvent {
        let seq = RecordEventSeq(self.next_event_seq);
        self.next_event_seq = self.next_event_seq.saturating_add(1);

        self.records.insert(id, new_value);
        let ev = RecordChangedEvent::v1(seq, id, previous_value, new_value);
        debug_assert!(ev.validate().is_ok(), "invalid change row: {ev:?}");
        self.change_ledger.push(ev.clone());
        ev
    }

    pub fn change_events(&self) -> &[RecordChangedEvent] {
        &self.change_ledger
    }

    pub fn change_events_for_record(&self, id: &RecordId) -> Vec<&RecordChangedEvent> {
        self.change_ledger.iter().filter(|e| &e.id == id).collect()
    }

    /// Ledger rows strictly after `after`, in commit order. `RecordEventSeq(0)` reads from the start.
    pub fn change_events_since(&self, after: RecordEventSeq) -> &[RecordChangedEvent] {
        // Sequence numbers start at 1 and are dense, so row `n` sits at index `n - 1`.
        let start = usize::try_from(after.0)
            .unwrap_or(usize::MAX)
            .min(self.change_ledger.len());
        &self.change_ledger[start..]
    }

    pub fn attempt_overwrite_change_event(
        &mut self,
        _seq: RecordEventSeq,
    ) -> Result<(), StorageError> {
        Err(StorageError::AppendOnlyViolation {
            table: "record_change_ledger",
        })
    }
}
