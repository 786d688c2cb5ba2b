#![forbid(unsafe_code)]

use std::error::Error as StdError;

use thiserror::Error;

use crate::record::{Proof, RecordId, RecordValue};

/// Authority consulted before a record's commitment may change.
///
/// Implementations see attacker-influenced `proof` bytes and must treat them as untrusted.
/// `Ok(false)` is a rejection; `Err` is a failure of the controller itself and is surfaced to
/// the caller untouched.
pub trait Controller: Send + Sync {
    fn authorize(
        &self,
        id: &RecordId,
        current_value: &RecordValue,
        new_value: &RecordValue,
        proof: &Proof,
    ) -> Result<bool, ControllerError>;
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ControllerError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl ControllerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
