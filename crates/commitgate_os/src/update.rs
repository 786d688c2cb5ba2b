#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use commitgate_contracts::{
    ContractViolation, Controller, ControllerId, RecordChangedEvent, RecordEventSeq, RecordId,
    RecordState, RecordUpdateRequest, RecordValue, Validate,
};
use commitgate_storage::repo::RecordCommitRepo;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::config::{CurrentValueBinding, RecordUpdateConfig};
use crate::error::{RegistryError, UpdateError};
use crate::gateway::authorize_transition;
use crate::registry::ControllerRegistry;
use crate::verifier::verify_current_value;

/// Marks a record as having an update between verification and commit.
///
/// Released on drop, including when a controller panics mid-call.
struct InFlightGuard<'a> {
    in_flight: &'a Mutex<BTreeSet<RecordId>>,
    id: RecordId,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(
        in_flight: &'a Mutex<BTreeSet<RecordId>>,
        id: RecordId,
    ) -> Result<Self, UpdateError> {
        if !in_flight.lock().insert(id) {
            return Err(UpdateError::UpdateInProgress { id });
        }
        Ok(Self { in_flight, id })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.id);
    }
}

/// The authorized-update routine over a shared record store.
///
/// Runs verify -> authorize -> commit for each request. The controller call may run arbitrary
/// code, including calls back into this runtime; no lock is held across it, and the record's
/// in-flight guard makes any nested update of the same record fail with
/// [`UpdateError::UpdateInProgress`]. Store mutation happens only after the controller returns.
#[derive(Debug)]
pub struct RecordUpdateRuntime<S>
where
    S: RecordCommitRepo,
{
    config: RecordUpdateConfig,
    controllers: RwLock<ControllerRegistry>,
    store: Mutex<S>,
    in_flight: Mutex<BTreeSet<RecordId>>,
}

impl<S> RecordUpdateRuntime<S>
where
    S: RecordCommitRepo,
{
    pub fn new(
        config: RecordUpdateConfig,
        controllers: ControllerRegistry,
        store: S,
    ) -> Result<Self, ContractViolation> {
        config.validate()?;
        Ok(Self {
            config,
            controllers: RwLock::new(controllers),
            store: Mutex::new(store),
            in_flight: Mutex::new(BTreeSet::new()),
        })
    }

    pub fn config(&self) -> &RecordUpdateConfig {
        &self.config
    }

    pub fn register_controller(
        &self,
        id: ControllerId,
        controller: Arc<dyn Controller>,
    ) -> Result<(), RegistryError> {
        self.controllers.write().register(id, controller)
    }

    pub fn update(
        &self,
        request: &RecordUpdateRequest,
    ) -> Result<RecordChangedEvent, UpdateError> {
        request.validate()?;
        let max = self.config.max_proof_bytes as usize;
        if request.proof.len() > max {
            return Err(ContractViolation::TooLarge {
                field: "record_update_request.proof",
                max,
                got: request.proof.len(),
            }
            .into());
        }

        verify_current_value(
            &request.current_value,
            &request.current_value_preimages,
            self.config.bootstrap.as_ref(),
        )?;

        let _guard = InFlightGuard::acquire(&self.in_flight, request.id)?;

        self.check_binding(&*self.store.lock(), request)?;

        let controller = self
            .controllers
            .read()
            .resolve(&request.current_value_preimages.controller);
        authorize_transition(controller.as_deref(), request)?;
        debug!(
            record_id = %request.id,
            controller = %request.current_value_preimages.controller,
            "record update authorized"
        );

        // The substrate may have other writers; the binding is re-read under the same lock as the
        // commit so the ledger row's previous value is what was on file.
        let ev = {
            let mut store = self.store.lock();
            self.check_binding(&*store, request)?;
            store.commit_record_row(request.id, request.current_value, request.new_value)
        };
        info!(
            record_id = %ev.id,
            previous_value = %ev.previous_value,
            new_value = %ev.new_value,
            event_seq = ev.seq.0,
            "record commitment updated"
        );
        Ok(ev)
    }

    pub fn record_value(&self, id: &RecordId) -> RecordValue {
        self.store.lock().record_value_row(id)
    }

    pub fn record_state(&self, id: &RecordId) -> RecordState {
        self.store.lock().record_state_row(id)
    }

    pub fn change_events(&self) -> Vec<RecordChangedEvent> {
        self.store.lock().change_rows()
    }

    pub fn change_events_for_record(&self, id: &RecordId) -> Vec<RecordChangedEvent> {
        self.store.lock().change_rows_for_record(id)
    }

    pub fn change_events_since(&self, after: RecordEventSeq) -> Vec<RecordChangedEvent> {
        self.store.lock().change_rows_since(after)
    }

    pub fn into_store(self) -> S {
        self.store.into_inner()
    }

    /// Under `StoreBound`, the supplied current value must be the one on file.
    fn check_binding(&self, store: &S, request: &RecordUpdateRequest) -> Result<(), UpdateError> {
        if self.config.binding != CurrentValueBinding::StoreBound {
            return Ok(());
        }
        let stored = store.record_value_row(&request.id);
        if stored != request.current_value {
            return Err(UpdateError::StaleCurrentValue {
                id: request.id,
                supplied: request.current_value,
                stored,
            });
        }
        Ok(())
    }
}
