#![forbid(unsafe_code)]

use commitgate_contracts::{ContractViolation, RecordValuePreimages, Validate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_PROOF_BYTES: u32 = 16 * 1024;
pub const MAX_PROOF_BYTES_CEILING: u32 = 1024 * 1024;

/// How the claimed `current_value` relates to what is actually on file for the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentValueBinding {
    /// Only preimage consistency is checked; the caller vouches that the value is current.
    CallerAttested,
    /// The stored value is read after verification and must equal the claimed value.
    StoreBound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordUpdateConfig {
    pub binding: CurrentValueBinding,
    #[serde(default = "default_max_proof_bytes")]
    pub max_proof_bytes: u32,
    /// Preimages implied by the zero value of a never-committed record.
    #[serde(default)]
    pub bootstrap: Option<RecordValuePreimages>,
}

fn default_max_proof_bytes() -> u32 {
    DEFAULT_MAX_PROOF_BYTES
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

impl RecordUpdateConfig {
    pub fn mvp_v1() -> Self {
        Self {
            binding: CurrentValueBinding::StoreBound,
            max_proof_bytes: DEFAULT_MAX_PROOF_BYTES,
            bootstrap: None,
        }
    }

    pub fn with_binding(mut self, binding: CurrentValueBinding) -> Self {
        self.binding = binding;
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: RecordValuePreimages) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for RecordUpdateConfig {
    fn default() -> Self {
        Self::mvp_v1()
    }
}

impl Validate for RecordUpdateConfig {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.max_proof_bytes == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "record_update_config.max_proof_bytes",
                reason: "must be > 0",
            });
        }
        if self.max_proof_bytes > MAX_PROOF_BYTES_CEILING {
            return Err(ContractViolation::InvalidValue {
                field: "record_update_config.max_proof_bytes",
                reason: "must be <= 1 MiB",
            });
        }
        if let Some(b) = &self.bootstrap {
            if b.controller.is_zero() && b.storage_hash.is_zero() {
                return Err(ContractViolation::InvalidValue {
                    field: "record_update_config.bootstrap",
                    reason: "must not be all-zero",
                });
            }
        }
        Ok(())
    }
}
