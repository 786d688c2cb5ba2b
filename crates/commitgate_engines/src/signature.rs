#![forbid(unsafe_code)]

use commitgate_contracts::{Controller, ControllerError, ControllerId, Proof, RecordId, RecordValue};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};

pub const AUTHORIZATION_DOMAIN: &[u8] = b"commitgate.authorize.v1";

/// Digest a signer commits to when approving `current_value -> new_value` for `id`.
pub fn authorization_message(
    id: &RecordId,
    current_value: &RecordValue,
    new_value: &RecordValue,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(AUTHORIZATION_DOMAIN);
    hasher.update(id.as_bytes());
    hasher.update(current_value.as_bytes());
    hasher.update(new_value.as_bytes());
    hasher.finalize().into()
}

pub fn sign_authorization(
    signing_key: &SigningKey,
    id: &RecordId,
    current_value: &RecordValue,
    new_value: &RecordValue,
) -> Proof {
    let msg = authorization_message(id, current_value, new_value);
    Proof::new(signing_key.sign(&msg).to_bytes().to_vec())
}

/// Single-key policy: the proof must be an ed25519 signature over [`authorization_message`].
#[derive(Debug, Clone)]
pub struct Ed25519Controller {
    verifying_key: VerifyingKey,
}

impl Ed25519Controller {
    pub fn new(verifying_key: VerifyingKey) -> Self {
        Self { verifying_key }
    }

    pub fn from_public_key_bytes(bytes: &[u8; 32]) -> Result<Self, ControllerError> {
        let verifying_key = VerifyingKey::from_bytes(bytes)
            .map_err(|e| ControllerError::with_source("invalid ed25519 public key", e))?;
        Ok(Self { verifying_key })
    }

    /// Identity under which this controller is registered: SHA-256 of the public key.
    pub fn controller_id(&self) -> ControllerId {
        ControllerId(Sha256::digest(self.verifying_key.as_bytes()).into())
    }
}

impl Controller for Ed25519Controller {
    fn authorize(
        &self,
        id: &RecordId,
        current_value: &RecordValue,
        new_value: &RecordValue,
        proof: &Proof,
    ) -> Result<bool, ControllerError> {
        let Ok(sig_bytes) = <[u8; 64]>::try_from(proof.as_bytes()) else {
            return Ok(false);
        };
        let signature = Signature::from_bytes(&sig_bytes);
        let msg = authorization_message(id, current_value, new_value);
        Ok(self.verifying_key.verify_strict(&msg, &signature).is_ok())
    }
}
