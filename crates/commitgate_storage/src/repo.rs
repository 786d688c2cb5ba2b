#![forbid(unsafe_code)]

use commitgate_contracts::{RecordChangedEvent, RecordEventSeq, RecordId, RecordState, RecordValue};

use crate::store::InMemoryRecordStore;

/// Typed repository interface the update runtime commits through.
pub trait RecordCommitRepo {
    fn record_value_row(&self, id: &RecordId) -> RecordValue;
    fn record_state_row(&self, id: &RecordId) -> RecordState;

    /// Write `new_value` for `id` and append exactly one change row. Infallible by contract.
    fn commit_record_row(
        &mut self,
        id: RecordId,
        previous_value: RecordValue,
        new_value: RecordValue,
    ) -> RecordChangedEvent;

    fn change_rows(&self) -> Vec<RecordChangedEvent>;
    fn change_rows_for_record(&self, id: &RecordId) -> Vec<RecordChangedEvent>;
    fn change_rows_since(&self, after: RecordEventSeq) -> Vec<RecordChangedEvent>;
}

impl RecordCommitRepo for InMemoryRecordStore {
    fn record_value_row(&self, id: &RecordId) -> RecordValue {
        self.record_value(id)
    }

    fn record_state_row(&self, id: &RecordId) -> RecordState {
        self.record_state(id)
    }

    fn commit_record_row(
        &mut self,
        id: RecordId,
        previous_value: RecordValue,
        new_value: RecordValue,
    ) -> RecordChangedEvent {
        self.commit_record_update(id, previous_value, new_value)
    }

    fn change_rows(&self) -> Vec<RecordChangedEvent> {
        self.change_events().to_vec()
    }

    fn change_rows_for_record(&self, id: &RecordId) -> Vec<RecordChangedEvent> {
        self.change_events_for_record(id).into_iter().cloned().collect()
    }

    fn change_rows_since(&self, after: RecordEventSeq) -> Vec<RecordChangedEvent> {
        self.change_events_since(after).to_vec()
    }
}
