#![forbid(unsafe_code)]

pub mod commitment;
pub mod common;
pub mod controller;
pub mod record;

pub use common::{ContractViolation, SchemaVersion, Validate};
pub use controller::{Controller, ControllerError};
pub use record::{
    ControllerId, Proof, RecordChangedEvent, RecordEventSeq, RecordId, RecordState,
    RecordUpdateRequest, RecordValue, RecordValuePreimages, StorageHash,
};
