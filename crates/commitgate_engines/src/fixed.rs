#![forbid(unsafe_code)]

use commitgate_contracts::{Controller, ControllerError, Proof, RecordId, RecordValue};

/// Policy that answers every request the same way and ignores the proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDecisionController {
    approve: bool,
}

impl FixedDecisionController {
    pub fn approve_all() -> Self {
        Self { approve: true }
    }

    pub fn reject_all() -> Self {
        Self { approve: false }
    }
}

impl Controller for FixedDecisionController {
    fn authorize(
        &self,
        _id: &RecordId,
        _current_value: &RecordValue,
        _new_value: &RecordValue,
        _proof: &Proof,
    ) -> Result<bool, ControllerError> {
        Ok(self.approve)
    }
}
