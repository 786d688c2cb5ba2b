#![forbid(unsafe_code)]

use commitgate_contracts::{RecordValue, RecordValuePreimages};

use crate::error::UpdateError;

/// Check that `preimages` open `current_value`. Pure: no store access, no controller call.
///
/// The zero value of a never-committed record has no hash preimage; it opens only with the
/// deployment's bootstrap preimages, if any are configured.
pub fn verify_current_value(
    current_value: &RecordValue,
    preimages: &RecordValuePreimages,
    bootstrap: Option<&RecordValuePreimages>,
) -> Result<(), UpdateError> {
    let recomputed = preimages.commitment();
    if current_value.is_zero() {
        return match bootstrap {
            Some(b) if b == preimages => Ok(()),
            _ => Err(UpdateError::PreimageMismatch {
                current_value: *current_value,
                recomputed,
            }),
        };
    }
    if recomputed != *current_value {
        return Err(UpdateError::PreimageMismatch {
            current_value: *current_value,
            recomputed,
        });
    }
    Ok(())
}
