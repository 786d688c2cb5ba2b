#![forbid(unsafe_code)]

use commitgate_contracts::{RecordEventSeq, RecordId, RecordState, RecordValue};
use commitgate_storage::repo::RecordCommitRepo;
use commitgate_storage::store::{InMemoryRecordStore, StorageError};

fn rid(b: u8) -> RecordId {
    RecordId([b; 32])
}

fn val(b: u8) -> RecordValue {
    RecordValue([b; 32])
}

#[test]
fn at_rs_db_01_ledger_is_ordered_by_commit() {
    let mut s = InMemoryRecordStore::new_in_memory();
    s.commit_record_row(rid(1), RecordValue::ZERO, val(10));
    s.commit_record_row(rid(2), RecordValue::ZERO, val(20));
    s.commit_record_row(rid(1), val(10), val(11));

    let seqs: Vec<u64> = s.change_rows().iter().map(|e| e.seq.0).collect();
    assert_eq!(seqs, vec![1, 2, 3]);
    assert_eq!(s.record_value_row(&rid(1)), val(11));
    assert_eq!(s.record_value_row(&rid(2)), val(20));
    assert_eq!(s.record_count(), 2);
}

#[test]
fn at_rs_db_02_history_by_record_keeps_previous_values() {
    let mut s = InMemoryRecordStore::new_in_memory();
    s.commit_record_row(rid(1), RecordValue::ZERO, val(10));
    s.commit_record_row(rid(2), RecordValue::ZERO, val(20));
    s.commit_record_row(rid(1), val(10), val(11));

    let history = s.change_rows_for_record(&rid(1));
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].previous_value, RecordValue::ZERO);
    assert_eq!(history[1].previous_value, val(10));
    assert_eq!(history[1].new_value, val(11));
}

#[test]
fn at_rs_db_03_cursor_reads_strictly_after_seq() {
    let mut s = InMemoryRecordStore::new_in_memory();
    for b in 1..=4u8 {
        s.commit_record_row(rid(b), RecordValue::ZERO, val(b));
    }

    assert_eq!(s.change_rows_since(RecordEventSeq(0)).len(), 4);
    let tail = s.change_rows_since(RecordEventSeq(2));
    assert_eq!(tail.len(), 2);
    assert_eq!(tail[0].seq, RecordEventSeq(3));
    assert!(s.change_rows_since(RecordEventSeq(4)).is_empty());
    assert!(s.change_rows_since(RecordEventSeq(u64::MAX)).is_empty());
}

#[test]
fn at_rs_db_04_change_ledger_is_append_only() {
    let mut s = InMemoryRecordStore::new_in_memory();
    let ev = s.commit_record_row(rid(1), RecordValue::ZERO, val(10));
    assert_eq!(
        s.attempt_overwrite_change_event(ev.seq),
        Err(StorageError::AppendOnlyViolation {
            table: "record_change_ledger"
        })
    );
    assert_eq!(s.change_rows().len(), 1);
}

#[test]
fn at_rs_db_05_state_machine_moves_only_on_commit() {
    let mut s = InMemoryRecordStore::new_in_memory();
    assert_eq!(s.record_state_row(&rid(7)), RecordState::Uncommitted);
    s.commit_record_row(rid(7), RecordValue::ZERO, val(1));
    assert_eq!(s.record_state_row(&rid(7)), RecordState::Committed(val(1)));
    s.commit_record_row(rid(7), val(1), val(2));
    assert_eq!(s.record_state_row(&rid(7)), RecordState::Committed(val(2)));
}

#[test]
fn at_rs_db_06_change_rows_serialize_for_indexers() {
    let mut s = InMemoryRecordStore::new_in_memory();
    let ev = s.commit_record_row(rid(1), RecordValue::ZERO, val(10));
    let json = serde_json::to_value(&ev).unwrap();
    assert_eq!(json["seq"], 1);
    assert_eq!(json["id"], rid(1).to_hex());
    assert_eq!(json["previous_value"], RecordValue::ZERO.to_hex());
    assert_eq!(json["new_value"], val(10).to_hex());
}
