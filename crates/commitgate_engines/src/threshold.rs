#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use commitgate_contracts::{
    ContractViolation, Controller, ControllerError, Proof, RecordId, RecordValue,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdProofPart {
    pub member: u16,
    pub proof_b64: String,
}

/// Wire shape of a threshold proof: one opaque sub-proof per participating member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdProof {
    pub parts: Vec<ThresholdProofPart>,
}

impl ThresholdProof {
    pub fn push(&mut self, member: u16, proof: &Proof) {
        self.parts.push(ThresholdProofPart {
            member,
            proof_b64: BASE64.encode(proof.as_bytes()),
        });
    }

    pub fn encode(&self) -> Result<Proof, ControllerError> {
        let bytes = serde_json::to_vec(self)
            .map_err(|e| ControllerError::with_source("threshold proof encode failed", e))?;
        Ok(Proof::new(bytes))
    }

    pub fn decode(proof: &Proof) -> Result<Self, ControllerError> {
        serde_json::from_slice(proof.as_bytes())
            .map_err(|e| ControllerError::with_source("malformed threshold proof", e))
    }
}

/// m-of-n policy over member controllers.
pub struct ThresholdController {
    members: Vec<Arc<dyn Controller>>,
    threshold: u16,
}

impl fmt::Debug for ThresholdController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThresholdController")
            .field("members", &self.members.len())
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl ThresholdController {
    pub fn new(
        members: Vec<Arc<dyn Controller>>,
        threshold: u16,
    ) -> Result<Self, ContractViolation> {
        if threshold == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "threshold_controller.threshold",
                reason: "must be > 0",
            });
        }
        if members.len() > u16::MAX as usize {
            return Err(ContractViolation::InvalidValue {
                field: "threshold_controller.members",
                reason: "must be <= 65535 members",
            });
        }
        if threshold as usize > members.len() {
            return Err(ContractViolation::InvalidValue {
                field: "threshold_controller.threshold",
                reason: "must be <= member count",
            });
        }
        Ok(Self { members, threshold })
    }
}

impl Controller for ThresholdController {
    fn authorize(
        &self,
        id: &RecordId,
        current_value: &RecordValue,
        new_value: &RecordValue,
        proof: &Proof,
    ) -> Result<bool, ControllerError> {
        let decoded = ThresholdProof::decode(proof)?;
        let mut seen = BTreeSet::new();
        let mut approvals: u16 = 0;

        for part in &decoded.parts {
            if !seen.insert(part.member) {
                // A member counts once no matter how many parts name it.
                continue;
            }
            let Some(member) = self.members.get(part.member as usize) else {
                return Err(ControllerError::new("threshold proof names unknown member"));
            };
            let sub_proof = BASE64
                .decode(&part.proof_b64)
                .map_err(|e| ControllerError::with_source("malformed threshold sub-proof", e))?;
            if member.authorize(id, current_value, new_value, &Proof::new(sub_proof))? {
                approvals += 1;
                if approvals >= self.threshold {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}
