#![forbid(unsafe_code)]

use commitgate_contracts::{ContractViolation, ControllerError, ControllerId, RecordId, RecordValue};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedReason {
    /// The controller answered `false`.
    Rejected,
    /// No controller is reachable under the identity named by the preimages.
    ControllerUnavailable,
}

/// Terminal failure of one update attempt. Every variant leaves the store and ledger untouched.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("preimages hash to {recomputed}, not to the claimed current value {current_value}")]
    PreimageMismatch {
        current_value: RecordValue,
        recomputed: RecordValue,
    },
    #[error("controller {controller} did not authorize update of record {id} ({reason:?})")]
    Unauthorized {
        id: RecordId,
        controller: ControllerId,
        reason: UnauthorizedReason,
    },
    #[error("controller {controller} failed: {source}")]
    ControllerFailed {
        controller: ControllerId,
        #[source]
        source: ControllerError,
    },
    #[error("record {id} already has an update in flight")]
    UpdateInProgress { id: RecordId },
    #[error("record {id}: supplied current value {supplied} does not match stored value {stored}")]
    StaleCurrentValue {
        id: RecordId,
        supplied: RecordValue,
        stored: RecordValue,
    },
    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("controller {controller} is already registered")]
    DuplicateController { controller: ControllerId },
}
