#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::commitment::commit_preimages;
use crate::{ContractViolation, SchemaVersion, Validate};

pub const RECORD_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

macro_rules! fixed_bytes_newtype {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            pub const ZERO: Self = Self([0u8; 32]);

            pub fn from_hex(s: &str) -> Result<Self, ContractViolation> {
                let mut out = [0u8; 32];
                hex::decode_to_slice(s, &mut out).map_err(|_| {
                    ContractViolation::InvalidValue {
                        field: $field,
                        reason: "must be exactly 64 hex chars",
                    }
                })?;
                Ok(Self(out))
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

fixed_bytes_newtype!(
    /// Opaque name of a record slot. Assigned by the surrounding system.
    RecordId,
    "record_id"
);

fixed_bytes_newtype!(
    /// Commitment stored for a record: `SHA-256(controller ++ storage_hash)`.
    RecordValue,
    "record_value"
);

fixed_bytes_newtype!(
    /// Identity of the authority consulted for a record transition.
    ControllerId,
    "controller_id"
);

fixed_bytes_newtype!(
    /// Hash of the record content the commitment stands in for.
    StorageHash,
    "storage_hash"
);

/// Opaque authorization evidence. Only the consulted controller interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Proof(Vec<u8>);

impl Proof {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordValuePreimages {
    pub controller: ControllerId,
    pub storage_hash: StorageHash,
}

impl RecordValuePreimages {
    pub fn new(controller: ControllerId, storage_hash: StorageHash) -> Self {
        Self {
            controller,
            storage_hash,
        }
    }

    pub fn commitment(&self) -> RecordValue {
        commit_preimages(&self.controller, &self.storage_hash)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdateRequest {
    pub schema_version: SchemaVersion,
    pub id: RecordId,
    /// Commitment the caller claims is current for `id`.
    pub current_value: RecordValue,
    pub current_value_preimages: RecordValuePreimages,
    pub new_value: RecordValue,
    pub proof: Proof,
}

impl RecordUpdateRequest {
    pub fn v1(
        id: RecordId,
        current_value: RecordValue,
        current_value_preimages: RecordValuePreimages,
        new_value: RecordValue,
        proof: Proof,
    ) -> Result<Self, ContractViolation> {
        let r = Self {
            schema_version: RECORD_CONTRACT_VERSION,
            id,
            current_value,
            current_value_preimages,
            new_value,
            proof,
        };
        r.validate()?;
        Ok(r)
    }
}

impl Validate for RecordUpdateRequest {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != RECORD_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "record_update_request.schema_version",
                reason: "must match RECORD_CONTRACT_VERSION",
            });
        }
        if self.new_value.is_zero() {
            return Err(ContractViolation::InvalidValue {
                field: "record_update_request.new_value",
                reason: "must not be the zero commitment",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordEventSeq(pub u64);

impl Validate for RecordEventSeq {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.0 == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "record_event_seq",
                reason: "must be > 0",
            });
        }
        Ok(())
    }
}

/// Notification emitted once per committed update, in commit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordChangedEvent {
    pub seq: RecordEventSeq,
    pub id: RecordId,
    pub previous_value: RecordValue,
    pub new_value: RecordValue,
}

impl RecordChangedEvent {
    pub fn v1(
        seq: RecordEventSeq,
        id: RecordId,
        previous_value: RecordValue,
        new_value: RecordValue,
    ) -> Self {
        Self {
            seq,
            id,
            previous_value,
            new_value,
        }
    }
}

impl Validate for RecordChangedEvent {
    fn validate(&self) -> Result<(), ContractViolation> {
        self.seq.validate()?;
        if self.new_value.is_zero() {
            return Err(ContractViolation::InvalidValue {
                field: "record_changed_event.new_value",
                reason: "must not be the zero commitment",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Uncommitted,
    Committed(RecordValue),
}
