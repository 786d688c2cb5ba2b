#![forbid(unsafe_code)]

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, Weak};

use commitgate_contracts::{
    Controller, ControllerError, ControllerId, Proof, RecordId, RecordUpdateRequest, RecordValue,
    RecordValuePreimages, StorageHash,
};
use commitgate_os::{
    ControllerRegistry, CurrentValueBinding, RecordUpdateConfig, RecordUpdateRuntime, UpdateError,
};
use commitgate_storage::store::InMemoryRecordStore;

type Runtime = RecordUpdateRuntime<InMemoryRecordStore>;

const HOSTILE: ControllerId = ControllerId([0xEE; 32]);

fn bootstrap() -> RecordValuePreimages {
    RecordValuePreimages::new(HOSTILE, StorageHash::ZERO)
}

fn bootstrap_request(id: RecordId, new_value: RecordValue) -> RecordUpdateRequest {
    RecordUpdateRequest::v1(id, RecordValue::ZERO, bootstrap(), new_value, Proof::empty()).unwrap()
}

/// Approves, but first tries to push its own update for `nested_target` through the runtime.
struct ReentrantController {
    runtime: OnceLock<Weak<Runtime>>,
    nested_target: RecordId,
    armed: AtomicBool,
    nested_outcomes: Mutex<Vec<Result<RecordValue, String>>>,
}

impl Controller for ReentrantController {
    fn authorize(
        &self,
        _id: &RecordId,
        _current_value: &RecordValue,
        _new_value: &RecordValue,
        _proof: &Proof,
    ) -> Result<bool, ControllerError> {
        if !self.armed.swap(false, Ordering::SeqCst) {
            return Ok(true);
        }
        let rt = self
            .runtime
            .get()
            .and_then(Weak::upgrade)
            .ok_or_else(|| ControllerError::new("runtime gone"))?;
        let outcome = rt
            .update(&bootstrap_request(self.nested_target, RecordValue([0xAD; 32])))
            .map(|ev| ev.new_value)
            .map_err(|e| match e {
                UpdateError::UpdateInProgress { .. } => "in_progress".to_string(),
                other => other.to_string(),
            });
        self.nested_outcomes.lock().unwrap().push(outcome);
        Ok(true)
    }
}

fn hostile_runtime(nested_target: RecordId) -> (Arc<Runtime>, Arc<ReentrantController>) {
    hostile_runtime_with(nested_target, CurrentValueBinding::StoreBound)
}

fn hostile_runtime_with(
    nested_target: RecordId,
    binding: CurrentValueBinding,
) -> (Arc<Runtime>, Arc<ReentrantController>) {
    let hostile = Arc::new(ReentrantController {
        runtime: OnceLock::new(),
        nested_target,
        armed: AtomicBool::new(true),
        nested_outcomes: Mutex::new(Vec::new()),
    });
    let mut reg = ControllerRegistry::new();
    reg.register(HOSTILE, hostile.clone()).unwrap();
    let rt = Arc::new(
        RecordUpdateRuntime::new(
            RecordUpdateConfig::mvp_v1()
                .with_binding(binding)
                .with_bootstrap(bootstrap()),
            reg,
            InMemoryRecordStore::new_in_memory(),
        )
        .unwrap(),
    );
    hostile.runtime.set(Arc::downgrade(&rt)).unwrap();
    (rt, hostile)
}

#[test]
fn at_reent_01_nested_update_of_same_record_is_refused() {
    let k = RecordId([0x4B; 32]);
    let (rt, hostile) = hostile_runtime(k);

    let ev = rt.update(&bootstrap_request(k, RecordValue([0x01; 32]))).unwrap();

    assert_eq!(
        hostile.nested_outcomes.lock().unwrap().as_slice(),
        &[Err("in_progress".to_string())]
    );
    assert_eq!(ev.new_value, RecordValue([0x01; 32]));
    assert_eq!(rt.record_value(&k), RecordValue([0x01; 32]));
    assert_eq!(rt.change_events(), vec![ev]);
}

#[test]
fn at_reent_02_nested_update_of_other_record_is_independent() {
    let k = RecordId([0x4B; 32]);
    let other = RecordId([0x4C; 32]);
    let (rt, hostile) = hostile_runtime(other);

    rt.update(&bootstrap_request(k, RecordValue([0x01; 32]))).unwrap();

    assert_eq!(
        hostile.nested_outcomes.lock().unwrap().as_slice(),
        &[Ok(RecordValue([0xAD; 32]))]
    );
    // The nested commit lands first; the outer commit follows it in the ledger.
    let ids: Vec<RecordId> = rt.change_events().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![other, k]);
}

#[test]
fn at_reent_04_guard_alone_refuses_nested_update_when_caller_attested() {
    let k = RecordId([0x4B; 32]);
    let (rt, hostile) = hostile_runtime_with(k, CurrentValueBinding::CallerAttested);

    let ev = rt.update(&bootstrap_request(k, RecordValue([0x01; 32]))).unwrap();

    assert_eq!(
        hostile.nested_outcomes.lock().unwrap().as_slice(),
        &[Err("in_progress".to_string())]
    );
    assert_eq!(rt.record_value(&k), RecordValue([0x01; 32]));
    assert_eq!(rt.change_events(), vec![ev]);
}

struct PanickingOnce {
    calls: AtomicUsize,
}

impl Controller for PanickingOnce {
    fn authorize(
        &self,
        _id: &RecordId,
        _current_value: &RecordValue,
        _new_value: &RecordValue,
        _proof: &Proof,
    ) -> Result<bool, ControllerError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("controller blew up");
        }
        Ok(true)
    }
}

#[test]
fn at_reent_03_panicking_controller_releases_the_record() {
    let controller = Arc::new(PanickingOnce {
        calls: AtomicUsize::new(0),
    });
    let mut reg = ControllerRegistry::new();
    reg.register(HOSTILE, controller.clone()).unwrap();
    let rt = RecordUpdateRuntime::new(
        RecordUpdateConfig::mvp_v1().with_bootstrap(bootstrap()),
        reg,
        InMemoryRecordStore::new_in_memory(),
    )
    .unwrap();

    let k = RecordId([0x4B; 32]);
    let req = bootstrap_request(k, RecordValue([0x01; 32]));
    let first = panic::catch_unwind(AssertUnwindSafe(|| rt.update(&req)));
    assert!(first.is_err());
    assert!(rt.change_events().is_empty());

    rt.update(&req).unwrap();
    assert_eq!(controller.calls.load(Ordering::SeqCst), 2);
    assert_eq!(rt.record_value(&k), RecordValue([0x01; 32]));
}
